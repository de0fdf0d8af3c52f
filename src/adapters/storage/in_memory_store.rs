//! In-memory conversation store.
//!
//! Backing store for tests and single-process deployments. State saves
//! replace the whole aggregate under one lock, which gives the atomicity
//! the core requires (advisor pointer, scores, previous advisors, and
//! summary always move together).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::conversation::{ConversationState, Message};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::ports::{ConversationRecord, ConversationStore, StoreError};

#[derive(Debug, Clone)]
struct StoredConversation {
    record: ConversationRecord,
    messages: Vec<Message>,
}

/// Thread-safe in-memory implementation of [`ConversationStore`].
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<ConversationId, StoredConversation>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err(context: &str) -> StoreError {
        StoreError::Backend(format!("lock poisoned: {context}"))
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, record: ConversationRecord) -> Result<(), StoreError> {
        let mut guard = self
            .conversations
            .write()
            .map_err(|_| Self::lock_err("create"))?;

        if guard.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }
        guard.insert(
            record.id,
            StoredConversation {
                record,
                messages: Vec::new(),
            },
        );
        Ok(())
    }

    async fn load(&self, id: ConversationId) -> Result<ConversationRecord, StoreError> {
        let guard = self
            .conversations
            .read()
            .map_err(|_| Self::lock_err("load"))?;

        guard
            .get(&id)
            .map(|stored| stored.record.clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn save_state(
        &self,
        id: ConversationId,
        state: &ConversationState,
    ) -> Result<(), StoreError> {
        let mut guard = self
            .conversations
            .write()
            .map_err(|_| Self::lock_err("save_state"))?;

        let stored = guard.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        stored.record.state = state.clone();
        stored.record.last_activity = Timestamp::now();
        Ok(())
    }

    async fn append_message(
        &self,
        id: ConversationId,
        message: Message,
    ) -> Result<(), StoreError> {
        let mut guard = self
            .conversations
            .write()
            .map_err(|_| Self::lock_err("append_message"))?;

        let stored = guard.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        stored.messages.push(message);
        stored.record.last_activity = Timestamp::now();
        Ok(())
    }

    async fn messages(&self, id: ConversationId) -> Result<Vec<Message>, StoreError> {
        let guard = self
            .conversations
            .read()
            .map_err(|_| Self::lock_err("messages"))?;

        guard
            .get(&id)
            .map(|stored| stored.messages.clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn recent_messages(
        &self,
        id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let all = self.messages(id).await?;
        let start = all.len().saturating_sub(limit);
        Ok(all[start..].to_vec())
    }

    async fn exists(&self, id: ConversationId) -> Result<bool, StoreError> {
        let guard = self
            .conversations
            .read()
            .map_err(|_| Self::lock_err("exists"))?;
        Ok(guard.contains_key(&id))
    }
}
