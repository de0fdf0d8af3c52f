//! Mock AI provider for tests.
//!
//! Configurable to return scripted structured payloads, plain text, or
//! injected errors, with call tracking for verification. No network.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, ProviderInfo, TokenUsage,
};

/// A scripted response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Successful completion with optional structured payload.
    Success {
        content: String,
        structured: Option<serde_json::Value>,
    },
    /// Injected failure.
    Error(MockError),
}

/// Mock error kinds (AiError is not Clone, so the script stores these).
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Timeout { timeout_secs: u32 },
    Network { message: String },
    Unavailable { message: String },
    AuthenticationFailed,
}

impl From<MockError> for AiError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AiError::RateLimited { retry_after_secs },
            MockError::Timeout { timeout_secs } => AiError::Timeout { timeout_secs },
            MockError::Network { message } => AiError::Network(message),
            MockError::Unavailable { message } => AiError::Unavailable { message },
            MockError::AuthenticationFailed => AiError::AuthenticationFailed,
        }
    }
}

/// Scripted AI provider. Responses are consumed in order; when the script
/// runs dry, a neutral plain-text response is returned.
#[derive(Debug, Clone)]
pub struct MockAiProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Duration,
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// Queues a plain-text response.
    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::Success {
            content: content.into(),
            structured: None,
        });
        self
    }

    /// Queues a structured (function-call style) response.
    pub fn with_structured(self, payload: serde_json::Value) -> Self {
        self.push(MockResponse::Success {
            content: String::new(),
            structured: Some(payload),
        });
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockResponse::Success {
                content: "mock response".to_string(),
                structured: None,
            })
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success { content, structured } => Ok(CompletionResponse {
                content,
                structured,
                model: "mock-model".to_string(),
                usage: TokenUsage::new(10, 20),
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model")
    }
}
