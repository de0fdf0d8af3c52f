//! Conversation aggregate: the append-only message log entities and the
//! persisted orchestration state.

mod message;
mod state;

pub use message::{Author, Message};
pub use state::{AdvisorSummary, ConversationState};
