//! Shared value objects used across the domain.

mod errors;
mod ids;
mod percentage;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ConversationId, MessageId, UserId};
pub use percentage::Percentage;
pub use timestamp::Timestamp;
