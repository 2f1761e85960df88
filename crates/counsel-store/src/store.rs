//! The chat state container.
//!
//! `ChatStore` owns all persisted state behind a mutex and exposes an
//! explicit mutation API. Every mutation writes the full snapshot back
//! through the injected `PersistenceAdapter`.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use counsel_core::types::{Chat, ChatMessage, User};

use crate::error::StoreError;
use crate::persistence::{PersistenceAdapter, StoreSnapshot};
use crate::title::derive_title;

/// Thread-safe container for chats, the active-chat pointer, and the user.
pub struct ChatStore {
    state: Mutex<StoreSnapshot>,
    persistence: Arc<dyn PersistenceAdapter>,
}

impl ChatStore {
    /// Construct a store, reading any existing snapshot from the adapter.
    pub fn new(persistence: Arc<dyn PersistenceAdapter>) -> Result<Self, StoreError> {
        let snapshot = persistence.load()?.unwrap_or_default();
        tracing::info!(
            chats = snapshot.chats.len(),
            has_user = snapshot.user.is_some(),
            "Chat store initialized"
        );
        Ok(Self {
            state: Mutex::new(snapshot),
            persistence,
        })
    }

    /// Add a chat at the front of the list.
    ///
    /// The new chat becomes current only if no chat was current before.
    pub fn add_chat(&self, chat: Chat) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.current_chat_id.is_none() {
            state.current_chat_id = Some(chat.id);
        }
        state.chats.insert(0, chat);
        self.persist(&state)
    }

    /// Delete a chat by id.
    ///
    /// Clears the active-chat pointer if it pointed at the deleted chat.
    /// Deleting an unknown id is a no-op.
    pub fn delete_chat(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.chats.retain(|chat| chat.id != id);
        if state.current_chat_id == Some(id) {
            state.current_chat_id = None;
        }
        self.persist(&state)
    }

    /// Point the store at a different chat (or none).
    pub fn set_current_chat(&self, id: Option<Uuid>) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.current_chat_id = id;
        self.persist(&state)
    }

    /// Append a message to a chat.
    ///
    /// Bumps `updated_at` and, when this is the chat's first message, derives
    /// the chat title from the message text. Messages are never mutated or
    /// removed afterwards.
    pub fn add_message(&self, chat_id: Uuid, message: ChatMessage) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let chat = state
            .chats
            .iter_mut()
            .find(|chat| chat.id == chat_id)
            .ok_or(StoreError::ChatNotFound(chat_id))?;

        if chat.messages.is_empty() {
            chat.title = derive_title(&message.text);
        }
        chat.messages.push(message);
        chat.updated_at = Utc::now();
        self.persist(&state)
    }

    /// Rename a chat. Bumps `updated_at`.
    pub fn rename_chat(&self, chat_id: Uuid, title: impl Into<String>) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let chat = state
            .chats
            .iter_mut()
            .find(|chat| chat.id == chat_id)
            .ok_or(StoreError::ChatNotFound(chat_id))?;
        chat.title = title.into();
        chat.updated_at = Utc::now();
        self.persist(&state)
    }

    /// Record the signed-in user, or clear it on sign-out.
    pub fn set_user(&self, user: Option<User>) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.user = user;
        self.persist(&state)
    }

    /// All chats, most recently created first.
    pub fn chats(&self) -> Result<Vec<Chat>, StoreError> {
        Ok(self.lock()?.chats.clone())
    }

    /// Look up a chat by id.
    pub fn chat(&self, id: Uuid) -> Result<Option<Chat>, StoreError> {
        Ok(self.lock()?.chats.iter().find(|c| c.id == id).cloned())
    }

    /// The chat the active-chat pointer refers to, if any.
    pub fn current_chat(&self) -> Result<Option<Chat>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .current_chat_id
            .and_then(|id| state.chats.iter().find(|c| c.id == id).cloned()))
    }

    /// The active-chat pointer.
    pub fn current_chat_id(&self) -> Result<Option<Uuid>, StoreError> {
        Ok(self.lock()?.current_chat_id)
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.user.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreSnapshot>, StoreError> {
        self.state
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn persist(&self, state: &StoreSnapshot) -> Result<(), StoreError> {
        self.persistence.save(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{JsonFileAdapter, MemoryAdapter};

    fn memory_store() -> ChatStore {
        ChatStore::new(Arc::new(MemoryAdapter::new())).unwrap()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = memory_store();
        assert!(store.chats().unwrap().is_empty());
        assert!(store.current_chat().unwrap().is_none());
        assert!(store.user().unwrap().is_none());
    }

    #[test]
    fn test_add_chat_sets_current_when_none() {
        let store = memory_store();
        let chat = Chat::new("New Chat");
        let id = chat.id;
        store.add_chat(chat).unwrap();
        assert_eq!(store.current_chat_id().unwrap(), Some(id));
    }

    #[test]
    fn test_add_chat_keeps_existing_current() {
        let store = memory_store();
        let first = Chat::new("first");
        let first_id = first.id;
        store.add_chat(first).unwrap();
        store.add_chat(Chat::new("second")).unwrap();
        assert_eq!(store.current_chat_id().unwrap(), Some(first_id));
    }

    #[test]
    fn test_chats_most_recent_first() {
        let store = memory_store();
        store.add_chat(Chat::new("older")).unwrap();
        store.add_chat(Chat::new("newer")).unwrap();
        let chats = store.chats().unwrap();
        assert_eq!(chats[0].title, "newer");
        assert_eq!(chats[1].title, "older");
    }

    #[test]
    fn test_delete_active_chat_clears_pointer() {
        let store = memory_store();
        let chat = Chat::new("doomed");
        let id = chat.id;
        store.add_chat(chat).unwrap();
        store.delete_chat(id).unwrap();
        assert!(store.current_chat_id().unwrap().is_none());
        assert!(store.chats().unwrap().is_empty());
    }

    #[test]
    fn test_delete_non_active_chat_keeps_pointer() {
        let store = memory_store();
        let active = Chat::new("active");
        let active_id = active.id;
        store.add_chat(active).unwrap();
        let other = Chat::new("other");
        let other_id = other.id;
        store.add_chat(other).unwrap();

        store.delete_chat(other_id).unwrap();
        assert_eq!(store.current_chat_id().unwrap(), Some(active_id));
        assert_eq!(store.chats().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_unknown_chat_is_noop() {
        let store = memory_store();
        store.add_chat(Chat::new("kept")).unwrap();
        store.delete_chat(Uuid::new_v4()).unwrap();
        assert_eq!(store.chats().unwrap().len(), 1);
    }

    #[test]
    fn test_add_message_bumps_updated_at() {
        let store = memory_store();
        let chat = Chat::new("New Chat");
        let id = chat.id;
        let created = chat.updated_at;
        store.add_chat(chat).unwrap();

        store.add_message(id, ChatMessage::user("hello")).unwrap();
        let chat = store.chat(id).unwrap().unwrap();
        assert!(chat.updated_at >= created);
        assert_eq!(chat.messages.len(), 1);
    }

    #[test]
    fn test_first_message_derives_title() {
        let store = memory_store();
        let chat = Chat::new("New Chat");
        let id = chat.id;
        store.add_chat(chat).unwrap();

        store
            .add_message(id, ChatMessage::user("What is an indemnity clause?"))
            .unwrap();
        let chat = store.chat(id).unwrap().unwrap();
        assert_eq!(chat.title, "What is an indemnity clause?...");
    }

    #[test]
    fn test_second_message_leaves_title_frozen() {
        let store = memory_store();
        let chat = Chat::new("New Chat");
        let id = chat.id;
        store.add_chat(chat).unwrap();

        store.add_message(id, ChatMessage::user("first")).unwrap();
        let title = store.chat(id).unwrap().unwrap().title;
        store
            .add_message(id, ChatMessage::assistant("a completely different text"))
            .unwrap();
        assert_eq!(store.chat(id).unwrap().unwrap().title, title);
    }

    #[test]
    fn test_add_message_unknown_chat_errors() {
        let store = memory_store();
        let result = store.add_message(Uuid::new_v4(), ChatMessage::user("lost"));
        assert!(matches!(result, Err(StoreError::ChatNotFound(_))));
    }

    #[test]
    fn test_rename_chat() {
        let store = memory_store();
        let chat = Chat::new("New Chat");
        let id = chat.id;
        store.add_chat(chat).unwrap();
        store.rename_chat(id, "Lease questions").unwrap();
        assert_eq!(store.chat(id).unwrap().unwrap().title, "Lease questions");
    }

    #[test]
    fn test_set_and_clear_user() {
        let store = memory_store();
        let user = User {
            name: "Ada".to_string(),
            picture: "p.png".to_string(),
            email: None,
            sub: Some("google-123".to_string()),
        };
        store.set_user(Some(user.clone())).unwrap();
        assert_eq!(store.user().unwrap(), Some(user));

        store.set_user(None).unwrap();
        assert!(store.user().unwrap().is_none());
    }

    #[test]
    fn test_set_current_chat() {
        let store = memory_store();
        let a = Chat::new("a");
        let a_id = a.id;
        store.add_chat(a).unwrap();
        let b = Chat::new("b");
        let b_id = b.id;
        store.add_chat(b).unwrap();

        store.set_current_chat(Some(b_id)).unwrap();
        assert_eq!(store.current_chat().unwrap().unwrap().id, b_id);
        store.set_current_chat(Some(a_id)).unwrap();
        assert_eq!(store.current_chat().unwrap().unwrap().id, a_id);
        store.set_current_chat(None).unwrap();
        assert!(store.current_chat().unwrap().is_none());
    }

    #[test]
    fn test_state_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat-storage.json");

        let chat_id = {
            let store = ChatStore::new(Arc::new(JsonFileAdapter::new(&path))).unwrap();
            let chat = Chat::new("New Chat");
            let id = chat.id;
            store.add_chat(chat).unwrap();
            store
                .add_message(id, ChatMessage::user("remember me"))
                .unwrap();
            id
        };

        let store = ChatStore::new(Arc::new(JsonFileAdapter::new(&path))).unwrap();
        let chat = store.chat(chat_id).unwrap().unwrap();
        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.messages[0].text, "remember me");
        assert_eq!(store.current_chat_id().unwrap(), Some(chat_id));
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let adapter = Arc::new(MemoryAdapter::new());
        let store = ChatStore::new(adapter.clone()).unwrap();
        let chat = Chat::new("persisted");
        let id = chat.id;
        store.add_chat(chat).unwrap();

        let on_disk = adapter.load().unwrap().unwrap();
        assert_eq!(on_disk.chats.len(), 1);

        store.add_message(id, ChatMessage::user("hi")).unwrap();
        let on_disk = adapter.load().unwrap().unwrap();
        assert_eq!(on_disk.chats[0].messages.len(), 1);
    }
}
