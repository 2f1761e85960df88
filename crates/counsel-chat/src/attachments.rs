//! File-selection gate for pending attachments.
//!
//! Applied eagerly at selection time, before anything reaches the
//! orchestrator: non-PDF files are dropped silently, and the pending list is
//! capped with a user-visible notice when a selection exceeds it.

use counsel_extract::AttachedFile;

/// Notice shown when a selection exceeds the attachment cap.
pub const TOO_MANY_FILES_NOTICE: &str = "Please select up to 3 PDF files.";

/// Result of filtering one file selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Number of files added to the pending list.
    pub accepted: usize,
    /// Non-PDF files silently dropped from the selection.
    pub ignored_non_pdf: usize,
    /// User-visible notice, set when PDFs were dropped for the cap.
    pub notice: Option<String>,
}

/// Filter a selection against the pending list.
///
/// Returns the files to append plus the outcome. `pending_len` is the current
/// size of the pending list; the combined total never exceeds `max_files`.
pub fn filter_pdf_selection(
    pending_len: usize,
    selection: Vec<AttachedFile>,
    max_files: usize,
) -> (Vec<AttachedFile>, SelectionOutcome) {
    let total = selection.len();
    let mut pdfs: Vec<AttachedFile> = selection.into_iter().filter(|f| f.is_pdf()).collect();
    let ignored_non_pdf = total - pdfs.len();

    let room = max_files.saturating_sub(pending_len);
    let over_cap = pdfs.len() > room;
    if over_cap {
        pdfs.truncate(room);
    }

    let outcome = SelectionOutcome {
        accepted: pdfs.len(),
        ignored_non_pdf,
        notice: over_cap.then(|| TOO_MANY_FILES_NOTICE.to_string()),
    };
    (pdfs, outcome)
}
