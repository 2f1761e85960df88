//! HTTP client for the remote question-answering backend.
//!
//! Reproduces the backend's request/response contract faithfully: a question
//! plus optional new document texts and a session id go out, an answer comes
//! back. No retries, no caching; failures surface as typed errors with an
//! explicit priority order for the user-facing message.

pub mod client;
pub mod error;
pub mod types;

pub use client::{AssistantBackend, HttpAssistantClient};
pub use error::ClientError;
pub use types::{AskRequest, AskResponse, HealthResponse, UploadResponse};
