//! Conversation service: the imperative shell around the turn engine.
//!
//! Owns per-conversation serialization (turns for one conversation run
//! strictly in submission order), cancellation (all-or-nothing with respect
//! to state mutation), and persistence of the turn outcome. The engine
//! itself stays a functional core: state in, state out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::domain::advisor::{AdvisorId, AdvisorNotFound, AdvisorRegistry};
use crate::domain::conversation::{ConversationState, Message};
use crate::domain::foundation::{ConversationId, UserId, ValidationError};
use crate::domain::orchestrator::{TurnEngine, TurnRequest, TurnResponse, HISTORY_WINDOW};
use crate::ports::{AiProvider, ConversationRecord, ConversationStore, StoreError};

/// Errors surfaced to the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] AdvisorNotFound),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

/// A freshly started conversation plus its greeting message.
#[derive(Debug, Clone)]
pub struct StartedConversation {
    pub record: ConversationRecord,
    pub greeting: Message,
}

/// Result of processing one user message.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub response: TurnResponse,
    pub state: ConversationState,
    /// True when the turn was cancelled mid-flight: the produced output was
    /// discarded and no state or advisor message was persisted.
    pub discarded: bool,
}

/// Application service driving conversations end to end.
pub struct ConversationService {
    store: Arc<dyn ConversationStore>,
    registry: Arc<AdvisorRegistry>,
    engine: TurnEngine,
    turn_locks: Mutex<HashMap<ConversationId, Arc<tokio::sync::Mutex<()>>>>,
    cancellations: Mutex<HashMap<ConversationId, Arc<AtomicBool>>>,
}

impl ConversationService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        registry: Arc<AdvisorRegistry>,
        provider: Arc<dyn AiProvider>,
    ) -> Self {
        Self {
            store,
            registry: registry.clone(),
            engine: TurnEngine::new(registry, provider),
            turn_locks: Mutex::new(HashMap::new()),
            cancellations: Mutex::new(HashMap::new()),
        }
    }

    /// Starts a conversation with the default advisor and its greeting.
    pub async fn start_conversation(
        &self,
        user_id: UserId,
        title: Option<String>,
    ) -> Result<StartedConversation, ServiceError> {
        let record = ConversationRecord::new(
            user_id,
            title.unwrap_or_else(|| "New conversation".to_string()),
        );

        let advisor = self.registry.get(AdvisorId::DEFAULT)?;
        let greeting_text = self.engine.assembler().intro_text(advisor);
        let greeting = Message::advisor(advisor.id, greeting_text)?;

        self.store.create(record.clone()).await?;
        self.store.append_message(record.id, greeting.clone()).await?;

        info!(conversation = %record.id, "conversation started");
        Ok(StartedConversation { record, greeting })
    }

    /// Processes one user message: runs the turn under the conversation's
    /// lock, then commits state and messages unless the turn was cancelled.
    pub async fn send_message(
        &self,
        conversation_id: ConversationId,
        text: String,
        manual_advisor: Option<AdvisorId>,
    ) -> Result<SendMessageResult, ServiceError> {
        // Single writer per conversation; turns run in submission order.
        let lock = self.turn_lock(conversation_id);
        let _guard = lock.lock().await;

        let record = self.store.load(conversation_id).await?;
        let user_message = Message::user(text.clone())?;

        // History for the prompt excludes the message being processed; the
        // engine appends the user text itself.
        let history = self
            .store
            .recent_messages(conversation_id, HISTORY_WINDOW)
            .await?;
        self.store.append_message(conversation_id, user_message).await?;

        let cancel_flag = self.register_cancellation(conversation_id);
        let outcome = self
            .engine
            .run(TurnRequest {
                state: record.state.clone(),
                history,
                user_text: text,
                manual_advisor,
            })
            .await;
        let cancelled = cancel_flag.load(Ordering::SeqCst);
        self.clear_cancellation(conversation_id);

        if cancelled {
            // All-or-nothing: a cancelled turn never partially updates
            // scores or the advisor pointer.
            warn!(conversation = %conversation_id, "turn cancelled; output discarded");
            return Ok(SendMessageResult {
                response: outcome.response,
                state: record.state,
                discarded: true,
            });
        }

        self.store.save_state(conversation_id, &outcome.state).await?;
        let advisor_message = Message::advisor(
            outcome.response.advisor_id,
            outcome.response.text.clone(),
        )?;
        self.store
            .append_message(conversation_id, advisor_message)
            .await?;

        Ok(SendMessageResult {
            response: outcome.response,
            state: outcome.state,
            discarded: false,
        })
    }

    /// Flags the conversation's in-flight turn as cancelled. Returns false
    /// when no turn is currently in flight.
    pub fn cancel(&self, conversation_id: ConversationId) -> bool {
        let flags = self.cancellations.lock().unwrap_or_else(|e| e.into_inner());
        match flags.get(&conversation_id) {
            Some(flag) => {
                flag.store(true, Ordering::SeqCst);
                info!(conversation = %conversation_id, "cancellation requested");
                true
            }
            None => false,
        }
    }

    /// Loads a conversation with its full message log.
    pub async fn get_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<(ConversationRecord, Vec<Message>), ServiceError> {
        let record = self.store.load(conversation_id).await?;
        let messages = self.store.messages(conversation_id).await?;
        Ok((record, messages))
    }

    fn turn_lock(&self, conversation_id: ConversationId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.turn_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(conversation_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn register_cancellation(&self, conversation_id: ConversationId) -> Arc<AtomicBool> {
        let flag = Arc::new(AtomicBool::new(false));
        self.cancellations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(conversation_id, flag.clone());
        flag
    }

    fn clear_cancellation(&self, conversation_id: ConversationId) {
        self.cancellations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&conversation_id);
    }
}
