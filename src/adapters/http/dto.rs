//! HTTP request/response shapes.
//!
//! Transport DTOs are kept separate from domain types; conversions live
//! here so the domain never learns about the wire format.

use serde::{Deserialize, Serialize};

use crate::application::{SendMessageResult, StartedConversation};
use crate::domain::conversation::Message;
use crate::ports::ConversationRecord;

#[derive(Debug, Deserialize)]
pub struct StartConversationRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
    /// Optional manual advisor switch. Honored only as an explicit
    /// override; server state is otherwise authoritative.
    #[serde(rename = "advisorId")]
    pub advisor_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversationDto {
    pub id: String,
    pub title: String,
    #[serde(rename = "currentAdvisor")]
    pub current_advisor: String,
    #[serde(rename = "previousAdvisors")]
    pub previous_advisors: Vec<String>,
    pub readiness: u8,
}

#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub id: String,
    pub role: String,
    #[serde(rename = "advisorId", skip_serializing_if = "Option::is_none")]
    pub advisor_id: Option<String>,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct StartConversationResponse {
    pub conversation: ConversationDto,
    pub greeting: MessageDto,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub text: String,
    #[serde(rename = "advisorId")]
    pub advisor_id: String,
    pub readiness: u8,
    pub discarded: bool,
}

#[derive(Debug, Serialize)]
pub struct ConversationDetailResponse {
    pub conversation: ConversationDto,
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ConversationRecord> for ConversationDto {
    fn from(record: &ConversationRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            current_advisor: record.state.current_advisor().to_string(),
            previous_advisors: record
                .state
                .previous_advisors()
                .iter()
                .map(ToString::to_string)
                .collect(),
            readiness: record.state.readiness().value(),
        }
    }
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            role: if message.is_user() { "user" } else { "advisor" }.to_string(),
            advisor_id: message.advisor_id().map(|id| id.to_string()),
            text: message.text().to_string(),
            created_at: message.created_at().to_string(),
        }
    }
}

impl From<&StartedConversation> for StartConversationResponse {
    fn from(started: &StartedConversation) -> Self {
        Self {
            conversation: ConversationDto::from(&started.record),
            greeting: MessageDto::from(&started.greeting),
        }
    }
}

impl From<&SendMessageResult> for SendMessageResponse {
    fn from(result: &SendMessageResult) -> Self {
        Self {
            text: result.response.text.clone(),
            advisor_id: result.response.advisor_id.to_string(),
            readiness: result.state.readiness().value(),
            discarded: result.discarded,
        }
    }
}
