//! OpenAI-compatible HTTP provider
//!
//! Posts chat-completion requests to a hosted API (Together AI by default)
//! and hands back the raw response body. Decoding the body is left to the
//! extractor.
//!
//! # Examples
//!
//! ```no_run
//! use studybud_llm::{HttpCompletionProvider, LlmConfig};
//!
//! let provider = HttpCompletionProvider::new(&LlmConfig::default(), "my-api-key").unwrap();
//! ```

use crate::config::LlmConfig;
use crate::types::ChatRequest;
use crate::{CompletionProvider, LlmError};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

/// Chat-completion provider speaking the OpenAI wire format over HTTPS
///
/// Construct once at startup and share; the inner client pools connections.
pub struct HttpCompletionProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpCompletionProvider {
    /// Create a provider from configuration and an API key
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Config)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        debug!(
            "Completion request: model={}, messages={}, json_schema={}",
            request.model,
            request.messages.len(),
            request.response_format.is_some()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        debug!("Completion response status: {}", status);

        if status.is_success() {
            return response
                .text()
                .await
                .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)));
        }

        let error = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized,
            StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(request.model.clone()),
            StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
            _ => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                LlmError::Communication(format!("HTTP {}: {}", status, error_text))
            }
        };

        warn!("Completion request failed: {}", error);
        Err(error)
    }
}
