//! Document text extraction for Counsel.
//!
//! Converts an uploaded file into plain text with a pass/fail outcome.
//! Extraction is a pure transformation of bytes to text: a single attempt,
//! no retries, no side effects. Callers decide whether a failure surfaces as
//! a notice or aborts a larger operation.

pub mod error;
pub mod extractor;

pub use error::ExtractError;
pub use extractor::{AttachedFile, DocumentExtractor, PdfExtractor, PDF_MIME_TYPE};
