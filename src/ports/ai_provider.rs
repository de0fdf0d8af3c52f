//! AI provider port: the opaque model call.
//!
//! The orchestration core treats the language model as a fallible function
//! from role-tagged messages to a response that may carry a structured
//! payload (function-call arguments). Providers own transport concerns and
//! any retry policy; the core treats every failure as terminal for that
//! call and applies its own fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for model completions.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generates a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError>;

    /// Provider identification for logging and diagnostics.
    fn provider_info(&self) -> ProviderInfo;
}

/// A role-tagged message sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Role of a chat message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A function-call style schema the model is required to answer through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSchema {
    /// Function name the model must call.
    pub name: String,
    /// What the structured response represents.
    pub description: String,
    /// JSON Schema of the expected arguments.
    pub parameters: serde_json::Value,
}

/// Request for one model completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Ordered messages: system instructions, trailing history, user text.
    pub messages: Vec<ChatMessage>,
    /// Schema the model must respond through, when structured output is
    /// required.
    pub response_schema: Option<ResponseSchema>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            response_schema: None,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Response from one model completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Plain text content. May be empty when the model answered through the
    /// response schema only.
    pub content: String,
    /// Parsed function-call arguments, when the model used the schema.
    /// Consumers must treat the shape defensively.
    pub structured: Option<serde_json::Value>,
    /// Model that produced the response.
    pub model: String,
    /// Token accounting for observability.
    pub usage: TokenUsage,
}

/// Token usage for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Provider identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g. "openai").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Network failure during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Provider reported itself unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The request itself was rejected as invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True when a retry at the transport layer could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AiError::RateLimited { .. }
                | AiError::Timeout { .. }
                | AiError::Network(_)
                | AiError::Unavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_options() {
        let request = CompletionRequest::new(vec![ChatMessage::user("hi")])
            .with_max_tokens(512)
            .with_temperature(0.6)
            .with_schema(ResponseSchema {
                name: "advisor_response".to_string(),
                description: "structured advisor answer".to_string(),
                parameters: serde_json::json!({"type": "object"}),
            });

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.max_tokens, Some(512));
        assert_eq!(request.temperature, Some(0.6));
        assert!(request.response_schema.is_some());
    }

    #[test]
    fn chat_message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("s").role, ChatRole::System);
        assert_eq!(ChatMessage::user("u").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("a").role, ChatRole::Assistant);
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn token_usage_totals_prompt_and_completion() {
        let usage = TokenUsage::new(100, 40);
        assert_eq!(usage.total_tokens, 140);
    }

    #[test]
    fn retryable_classification() {
        assert!(AiError::RateLimited { retry_after_secs: 5 }.is_retryable());
        assert!(AiError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(AiError::network("reset").is_retryable());
        assert!(AiError::unavailable("503").is_retryable());

        assert!(!AiError::AuthenticationFailed.is_retryable());
        assert!(!AiError::parse("bad json").is_retryable());
        assert!(!AiError::InvalidRequest("bad".into()).is_retryable());
    }
}
