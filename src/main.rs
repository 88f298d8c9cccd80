//! Gemini Question Relay
//!
//! This application accepts a question over HTTP, forwards it to the Gemini
//! `generateContent` API and relays the answer back as JSON.

mod api;
mod core;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::core::client::GeminiClient;
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::provider::Provider;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    // Values in .env are picked up as environment overrides
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    print_startup_banner(&config);

    // A missing key is reported on each request rather than at startup
    if !config.has_api_key() {
        warn!("GEMINI_API_KEY is not set; /ask will answer with a configuration error");
    }

    let provider: Arc<dyn Provider> = match GeminiClient::new(
        config.gemini_base_url.clone(),
        config.gemini_model.clone(),
        config.request_timeout,
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create Gemini client: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Using provider: {}", provider.provider_name());

    let app_state = AppState {
        config: config.clone(),
        provider,
    };

    let app = create_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🚀 Gemini Question Relay v0.1.0");
    println!("✅ Configuration loaded successfully");
    println!("   Base URL: {}", config.gemini_base_url);
    println!("   Model: {}", config.gemini_model);
    match config.request_timeout {
        Some(secs) => println!("   Request Timeout: {}s", secs),
        None => println!("   Request Timeout: none"),
    }
    println!("   Server: {}:{}", config.host, config.port);
    println!(
        "   API Key: {}",
        if config.has_api_key() {
            "Configured"
        } else {
            "Missing"
        }
    );
    println!();
}

/// Print help message
fn print_help() {
    println!("Gemini Question Relay v0.1.0");
    println!();
    println!("Usage: gemini-relay [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Endpoints:");
    println!("  POST /ask     {{\"question\": \"...\"}} -> {{\"answer\": \"...\"}}");
    println!("  GET  /health  Health check");
    println!();
    println!("Configuration file:");
    println!("  CONFIG_PATH - TOML config file (default: config.toml, optional)");
    println!();
    println!("Environment variables (override the config file, .env is loaded):");
    println!("  GEMINI_API_KEY - Gemini API key (required to answer questions)");
    println!("  GEMINI_BASE_URL - API base URL (default: https://generativelanguage.googleapis.com/v1beta)");
    println!("  GEMINI_MODEL - Model name (default: gemini-1.5-flash-latest)");
    println!("  REQUEST_TIMEOUT - Outbound request timeout in seconds (default: none)");
    println!("  HOST - Server host (default: 0.0.0.0)");
    println!("  PORT - Server port (default: 8888)");
    println!("  LOG_LEVEL - Logging level (default: info)");
}
