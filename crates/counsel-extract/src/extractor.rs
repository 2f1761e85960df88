//! PDF text extraction.
//!
//! `PdfExtractor` decodes PDF bytes on a blocking worker thread and applies
//! the readability gate: extracted text is trimmed and must reach a minimum
//! length, otherwise the attempt counts as a failure rather than a success
//! with empty content.

use async_trait::async_trait;

use crate::error::ExtractError;

/// MIME type accepted by the extractor.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Minimum trimmed length for extracted text to count as readable.
const DEFAULT_MIN_TEXT_CHARS: usize = 10;

/// A user-selected file pending extraction.
///
/// Transient: exists only between selection and a successful send, after
/// which the extracted text is kept and the raw bytes are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    /// Original file name, used in message annotations and error reports.
    pub name: String,
    /// MIME type as reported by the file input boundary.
    pub mime_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl AttachedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Whether the file input boundary should accept this file at all.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }
}

/// Converts an attached file into plain text.
///
/// Implementations make a single attempt and must not retry.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, file: &AttachedFile) -> Result<String, ExtractError>;
}

/// PDF extractor backed by the `pdf-extract` crate.
pub struct PdfExtractor {
    min_text_chars: usize,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TEXT_CHARS)
    }
}

impl PdfExtractor {
    /// Create an extractor with a custom readability threshold.
    pub fn new(min_text_chars: usize) -> Self {
        Self { min_text_chars }
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, file: &AttachedFile) -> Result<String, ExtractError> {
        if !file.is_pdf() {
            return Err(ExtractError::new(
                &file.name,
                format!("not a PDF document ({})", file.mime_type),
            ));
        }

        let name = file.name.clone();
        let bytes = file.bytes.clone();
        let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| {
                ExtractError::new(file.name.as_str(), format!("extraction task failed: {}", e))
            })?
            .map_err(|e| ExtractError::new(name.as_str(), e.to_string()))?;

        let text = validate_extracted(&raw, self.min_text_chars)
            .map_err(|reason| ExtractError::new(file.name.as_str(), reason))?;

        tracing::debug!(file = %file.name, chars = text.chars().count(), "PDF text extracted");
        Ok(text)
    }
}

/// Apply the readability gate: trim, then require a minimum length.
fn validate_extracted(raw: &str, min_chars: usize) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < min_chars {
        return Err("No readable text found in PDF.".to_string());
    }
    Ok(trimmed.to_string())
}
