//! Error types for the persisted chat store.

use counsel_core::error::CounselError;
use uuid::Uuid;

/// Errors from the chat store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("chat not found: {0}")]
    ChatNotFound(Uuid),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<StoreError> for CounselError {
    fn from(err: StoreError) -> Self {
        CounselError::Store(err.to_string())
    }
}
