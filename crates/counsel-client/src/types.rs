//! Wire types for the backend contract.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Whether the backend should consult session-scoped document context.
    pub use_documents: bool,
    /// Ephemeral correlation token for one view's sequence of calls.
    pub session_id: String,
    /// Only documents extracted in THIS turn. The backend retains earlier
    /// texts server-side, keyed by `session_id`.
    pub document_texts: Vec<String>,
}

/// Response of `POST /chat/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub source: String,
}

/// Response of `POST /upload-pdfs/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub total_chunks: u64,
    pub files_processed: Vec<String>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub documents_loaded: bool,
    pub using: String,
}

/// Error body the backend may attach to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
}
