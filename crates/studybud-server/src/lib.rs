//! StudyBud Server
//!
//! HTTP front end for the study assistant. Each route turns the user's text
//! into a chat-completion request, sends it to the configured provider, and
//! returns the extracted object.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod service;

use config::ServerConfig;
use handlers::{create_router, AppState};
use service::StudyAssistant;
use std::sync::Arc;
use studybud_llm::{HttpCompletionProvider, LlmError};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Completion client could not be created
    #[error("Completion client error: {0}")]
    Llm(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Validates configuration, builds the completion client once, and serves
/// until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;
    let api_key = config.api_key()?;

    info!("Starting StudyBud server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model: {} via {}", config.llm.model, config.llm.endpoint);
    info!("Input limit: {} characters", config.max_input_chars);

    let provider = HttpCompletionProvider::new(&config.llm, api_key)?;
    let assistant = StudyAssistant::new(Arc::new(provider), config.max_input_chars);

    let state = AppState {
        assistant: Arc::new(assistant),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
