//! Persisted chat state for Counsel.
//!
//! A single `ChatStore` holds the chat list, the active-chat pointer, and the
//! signed-in user. State is read once from an injected `PersistenceAdapter`
//! at construction and written back on every mutation, so it survives
//! application restarts.

pub mod error;
pub mod persistence;
pub mod store;
pub mod title;

pub use error::StoreError;
pub use persistence::{JsonFileAdapter, MemoryAdapter, PersistenceAdapter, StoreSnapshot};
pub use store::ChatStore;
pub use title::{derive_title, UPLOADED_CONTENT_MARKER};
