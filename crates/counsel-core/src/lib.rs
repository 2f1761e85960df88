//! Shared types, errors, and configuration for the Counsel legal-assistant
//! chat client.
//!
//! Every other crate in the workspace depends on this one. It holds the chat
//! data model (chats, messages, users), the top-level error type, and the
//! TOML-backed application configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::CounselConfig;
pub use error::{CounselError, Result};
pub use types::{Chat, ChatMessage, User};
