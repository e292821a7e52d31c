//! StudyBud LLM Provider Layer
//!
//! The boundary between the study assistant and hosted chat-completion APIs.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `HttpCompletionProvider`: OpenAI-compatible HTTP API (Together AI by default)
//!
//! Providers return the raw response body. They never retry; a failed call
//! is reported to the caller as an [`LlmError`].
//!
//! # Examples
//!
//! ```
//! use studybud_llm::{ChatRequest, CompletionProvider, MockProvider};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::with_content(r#"{"title": "Essay"}"#);
//! let body = provider
//!     .complete(&ChatRequest::new(provider.model(), "system", "user"))
//!     .await
//!     .unwrap();
//! assert!(body.contains("choices"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod http;
pub mod types;

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use config::LlmConfig;
pub use http::HttpCompletionProvider;
pub use types::{ChatMessage, ChatRequest, ResponseFormat, Role};

/// Errors that can occur during completion calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request did not finish within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// API key missing, invalid or lacking permission
    #[error("Unauthorized: check the API key")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A chat-completion backend
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model identifier requests should name
    fn model(&self) -> &str;

    /// Send a request and return the raw response body
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

/// Wrap `content` in a minimal chat-completion response body
pub fn completion_body(content: &str) -> String {
    json!({
        "id": "mock-completion",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

const MOCK_MODEL: &str = "mock-model";

#[derive(Debug, Clone)]
enum MockReply {
    Body(String),
    Error(LlmError),
}

/// Mock completion provider for deterministic testing
///
/// Returns pre-configured bodies without making any network calls. Replies
/// can be keyed by the request's user content.
///
/// # Examples
///
/// ```
/// use studybud_llm::MockProvider;
///
/// let mut provider = MockProvider::with_content("{}");
/// provider.add_content("Please extract key points", r#"{"key_points": []}"#);
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockProvider {
    /// Create a MockProvider returning a fixed raw body for all requests
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            default_reply: MockReply::Body(body.into()),
            replies: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockProvider whose every reply carries `content` as the message
    pub fn with_content(content: &str) -> Self {
        Self::new(completion_body(content))
    }

    /// Create a MockProvider that fails every request with `error`
    pub fn failing(error: LlmError) -> Self {
        Self {
            default_reply: MockReply::Error(error),
            ..Self::new("")
        }
    }

    /// Return `body` verbatim for requests whose user content starts with `prefix`
    pub fn add_response(&mut self, prefix: impl Into<String>, body: impl Into<String>) {
        lock(&self.replies).insert(prefix.into(), MockReply::Body(body.into()));
    }

    /// Return a completion carrying `content` for requests whose user content starts with `prefix`
    pub fn add_content(&mut self, prefix: impl Into<String>, content: &str) {
        self.add_response(prefix, completion_body(content));
    }

    /// Fail requests whose user content starts with `prefix`
    pub fn add_error(&mut self, prefix: impl Into<String>, error: LlmError) {
        lock(&self.replies).insert(prefix.into(), MockReply::Error(error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<ChatRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::with_content("{}")
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn model(&self) -> &str {
        MOCK_MODEL
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        lock(&self.requests).push(request.clone());

        let user_content = request.user_content().unwrap_or_default();
        let reply = {
            let replies = lock(&self.replies);
            replies
                .iter()
                .filter(|(prefix, _)| user_content.starts_with(prefix.as_str()))
                .max_by_key(|(prefix, _)| prefix.len())
                .map(|(_, reply)| reply.clone())
                .unwrap_or_else(|| self.default_reply.clone())
        };

        match reply {
            MockReply::Body(body) => Ok(body),
            MockReply::Error(error) => Err(error),
        }
    }
}

// Recover the data from a poisoned lock; the mock holds no invariants across panics
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
