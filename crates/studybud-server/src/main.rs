//! StudyBud Server CLI
//!
//! Starts the HTTP server for the study assistant.

use std::env;
use std::process;
use studybud_server::{config::ServerConfig, start_server, ServerError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env before reading the API key
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: studybud-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default()
    };

    start_server(config).await
}

fn print_help() {
    println!("StudyBud Server - AI study assistant HTTP API");
    println!();
    println!("USAGE:");
    println!("    studybud-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default: '0.0.0.0')");
    println!("    - bind_port: Port number (default: 8000)");
    println!("    - max_input_chars: Longest accepted input (default: 50000)");
    println!("    - [llm] endpoint, model, api_key_env, request_timeout_secs, user_agent");
    println!();
    println!("ENVIRONMENT:");
    println!("    TOGETHER_API_KEY   API key (name configurable via llm.api_key_env)");
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
}
