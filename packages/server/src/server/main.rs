// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::{
    server::{build_app, AppState},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricescout::fetch::{default_fetchers, StoreClient};
use pricescout::parser::{AnthropicParser, OpenAiParser, ParserStack};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (LOG_LEVEL wins over RUST_LOG)
    let filter = std::env::var("LOG_LEVEL")
        .ok()
        .map(tracing_subscriber::EnvFilter::new)
        .or_else(|| tracing_subscriber::EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| "info,server_core=debug,pricescout=debug".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting price comparison API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Query parser: OpenAI preferred, then Anthropic, else regex fallback only
    let parser = if let Some(key) = &config.openai_api_key {
        tracing::info!("Query parsing via OpenAI with regex fallback");
        ParserStack::with_ai(Arc::new(OpenAiParser::new(key.clone())))
    } else if let Some(key) = &config.anthropic_api_key {
        tracing::info!("Query parsing via Anthropic with regex fallback");
        ParserStack::with_ai(Arc::new(AnthropicParser::new(key.clone())))
    } else {
        tracing::warn!("No AI API key configured, using regex fallback parser only");
        ParserStack::fallback_only()
    };

    let fetchers = default_fetchers(StoreClient::new());
    let state = AppState::new(parser, fetchers);

    let app = build_app(
        state,
        config.rate_limit_window_ms,
        config.rate_limit_max_requests,
    );

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
