//! Error types for the backend client.

use counsel_core::error::CounselError;

/// Fallback shown when no more specific detail is available.
pub const GENERIC_FAILURE: &str = "Failed to get response from server.";

/// Errors from the remote assistant client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("backend returned status {status}")]
    Backend {
        status: u16,
        /// Structured detail field from the error body, when present.
        detail: Option<String>,
    },

    /// The request never completed: connection failure, DNS, timeout.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A 2xx response whose body did not match the contract.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// The most specific message available for user display.
    ///
    /// Priority: structured backend detail, then the transport or decode
    /// message, then a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Backend {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ClientError::Backend { status, .. } => {
                format!("Request failed with status code {}", status)
            }
            ClientError::Transport(msg) | ClientError::InvalidResponse(msg) => {
                if msg.is_empty() {
                    GENERIC_FAILURE.to_string()
                } else {
                    msg.clone()
                }
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<ClientError> for CounselError {
    fn from(err: ClientError) -> Self {
        CounselError::Backend(err.to_string())
    }
}
