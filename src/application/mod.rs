//! Application layer: use-case services over the domain core.

mod service;

pub use service::{ConversationService, SendMessageResult, ServiceError, StartedConversation};
