//! Error types for chat session orchestration.

use counsel_core::error::CounselError;
use counsel_extract::ExtractError;
use counsel_store::StoreError;

/// Errors from the session orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// An attachment could not be converted to text; the send was aborted
    /// before any message was appended or any network call made.
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// The persisted store rejected a mutation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal state error (poisoned lock or invalid phase transition).
    #[error("chat state error: {0}")]
    State(String),

    /// Voice capture lifecycle or adapter-reported failure.
    #[error("voice error: {0}")]
    Voice(String),
}

impl From<ChatError> for CounselError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Extraction(e) => CounselError::Extraction(e.to_string()),
            ChatError::Store(e) => CounselError::Store(e.to_string()),
            ChatError::State(msg) => CounselError::Chat(msg),
            ChatError::Voice(msg) => CounselError::Voice(msg),
        }
    }
}
