//! Configuration file parsing for the server.
//!
//! Loads the bind address, input limits and the completion client settings
//! from TOML. The API key itself never lives in the file; it is read from the
//! environment variable named by `llm.api_key_env`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use studybud_llm::LlmConfig;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// API key environment variable unset or empty
    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    /// A setting is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Longest accepted input, in characters
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Completion client settings
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

/// Default input limit: 50 000 characters
fn default_max_input_chars() -> usize {
    50_000
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::Invalid("bind_address must not be empty".to_string()));
        }
        if self.max_input_chars == 0 {
            return Err(ConfigError::Invalid(
                "max_input_chars must be greater than 0".to_string(),
            ));
        }
        self.llm
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("llm: {}", e)))
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey(self.llm.api_key_env.clone())),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            max_input_chars: default_max_input_chars(),
            llm: LlmConfig::default(),
        }
    }
}
