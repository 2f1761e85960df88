//! Snapshot persistence for the chat store.
//!
//! The entire store state is serialized as one named JSON record: read once
//! at startup, written on every mutation. Implementations are injected into
//! `ChatStore` so tests and ephemeral runs can swap the file system out.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use counsel_core::types::{Chat, User};

use crate::error::StoreError;

/// The full persisted state of the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub chats: Vec<Chat>,
    pub current_chat_id: Option<Uuid>,
    pub user: Option<User>,
}

/// Storage backend for `StoreSnapshot`.
///
/// `load` is called once when the store is constructed; `save` after every
/// mutation.
pub trait PersistenceAdapter: Send + Sync {
    /// Read the snapshot. `Ok(None)` means no snapshot exists yet.
    fn load(&self) -> Result<Option<StoreSnapshot>, StoreError>;

    /// Write the snapshot, replacing any previous one.
    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError>;
}

/// File-backed adapter storing the snapshot as pretty-printed JSON.
pub struct JsonFileAdapter {
    path: PathBuf,
}

impl JsonFileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PersistenceAdapter for JsonFileAdapter {
    fn load(&self) -> Result<Option<StoreSnapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Persistence(format!("read {}: {}", self.path.display(), e)))?;
        let snapshot = serde_json::from_str(&content).map_err(|e| {
            StoreError::Persistence(format!("parse {}: {}", self.path.display(), e))
        })?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Persistence(format!("create {}: {}", parent.display(), e))
            })?;
        }
        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StoreError::Persistence(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| {
            StoreError::Persistence(format!("write {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(path = %self.path.display(), "Snapshot saved");
        Ok(())
    }
}

/// In-memory adapter for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryAdapter {
    snapshot: Mutex<Option<StoreSnapshot>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn load(&self) -> Result<Option<StoreSnapshot>, StoreError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        *guard = Some(snapshot.clone());
        Ok(())
    }
}
