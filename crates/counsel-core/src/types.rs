//! Chat data model shared across the workspace.
//!
//! Chats are persisted locally and survive reloads; messages are immutable
//! once created and keep their display timestamp as formatted at creation
//! time. The user identity arrives from an external authentication
//! collaborator as a decoded token.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single message inside a chat transcript.
///
/// Immutable once created. The `timestamp` field is a display string
/// formatted at creation time and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier within the chat.
    pub id: Uuid,
    /// Message body. May embed document excerpts or file-name annotations.
    pub text: String,
    /// True for user-authored messages, false for assistant replies.
    pub is_user: bool,
    /// Display timestamp, formatted as HH:MM at creation.
    pub timestamp: String,
}

impl ChatMessage {
    /// Create a user-authored message stamped with the current local time.
    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped(text.into(), true)
    }

    /// Create an assistant-authored message stamped with the current local time.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::stamped(text.into(), false)
    }

    fn stamped(text: String, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            is_user,
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }
}

/// A titled, ordered conversation thread.
///
/// Messages are append-only from the orchestrator's perspective; `updated_at`
/// is monotonically non-decreasing and bumped on every append or metadata
/// update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Create an empty chat with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of user-authored messages in the transcript.
    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_user).count()
    }

    /// Number of assistant-authored messages in the transcript.
    pub fn assistant_message_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_user).count()
    }
}

/// Opaque user identity supplied by the authentication collaborator.
///
/// Fields mirror the decoded identity token: `name`, `picture`, and the
/// optional `email` / `sub` (subject id) claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub picture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}
