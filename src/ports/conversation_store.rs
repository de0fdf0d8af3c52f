//! Conversation store port.
//!
//! Persistence contract the orchestration core relies on. Implementations
//! must make [`save_state`](ConversationStore::save_state) atomic over the
//! whole state aggregate: the advisor pointer, scores, previous advisors,
//! and carried summary commit together or not at all. Message ordering is
//! creation order and stays stable for the lifetime of the conversation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{ConversationState, Message};
use crate::domain::foundation::{ConversationId, Timestamp, UserId};

/// Errors from conversation persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("conversation already exists: {0}")]
    AlreadyExists(ConversationId),

    #[error("failed to serialize conversation: {0}")]
    Serialization(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A stored conversation: identity, metadata, and orchestration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: ConversationId,
    pub user_id: UserId,
    pub title: String,
    pub state: ConversationState,
    pub started_at: Timestamp,
    pub last_activity: Timestamp,
}

impl ConversationRecord {
    /// Creates a record for a brand-new conversation.
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            user_id,
            title: title.into(),
            state: ConversationState::new(),
            started_at: now,
            last_activity: now,
        }
    }
}

/// Port for loading and saving conversations and their message log.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Creates a new conversation record.
    ///
    /// # Errors
    ///
    /// `StoreError::AlreadyExists` if the id is taken.
    async fn create(&self, record: ConversationRecord) -> Result<(), StoreError>;

    /// Loads a conversation record by id.
    async fn load(&self, id: ConversationId) -> Result<ConversationRecord, StoreError>;

    /// Replaces the conversation state atomically and bumps last activity.
    async fn save_state(
        &self,
        id: ConversationId,
        state: &ConversationState,
    ) -> Result<(), StoreError>;

    /// Appends one message to the conversation's ordered log.
    async fn append_message(&self, id: ConversationId, message: Message)
        -> Result<(), StoreError>;

    /// The full message log in creation order.
    async fn messages(&self, id: ConversationId) -> Result<Vec<Message>, StoreError>;

    /// The last `limit` messages in creation order.
    async fn recent_messages(
        &self,
        id: ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError>;

    /// Whether a conversation exists.
    async fn exists(&self, id: ConversationId) -> Result<bool, StoreError>;
}
