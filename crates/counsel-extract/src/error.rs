//! Error type for document extraction.

use counsel_core::error::CounselError;

/// A failed extraction attempt.
///
/// Carries the originating file name so the failure can be surfaced verbatim
/// to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to extract text from {file_name}: {reason}")]
pub struct ExtractError {
    /// Name of the file that failed.
    pub file_name: String,
    /// Underlying cause, human readable.
    pub reason: String,
}

impl ExtractError {
    pub fn new(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            reason: reason.into(),
        }
    }
}

impl From<ExtractError> for CounselError {
    fn from(err: ExtractError) -> Self {
        CounselError::Extraction(err.to_string())
    }
}
