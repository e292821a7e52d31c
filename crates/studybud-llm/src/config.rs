//! Configuration for the chat-completion client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Together AI chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.together.xyz/v1/chat/completions";

/// Default model
pub const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo";

/// Environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "TOGETHER_API_KEY";

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// User agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "StudyBud/1.0.0";

/// Configuration for the chat-completion client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Full URL of the chat-completions endpoint
    pub endpoint: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    /// Maximum time for a single completion request (seconds)
    pub request_timeout_secs: u64,

    /// User-Agent header value
    pub user_agent: String,
}

impl LlmConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(format!("endpoint must be an http(s) URL, got '{}'", self.endpoint));
        }
        if self.model.is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.api_key_env.is_empty() {
            return Err("api_key_env must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
