use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

mod config;
mod handlers;
mod models;
mod services;
mod utils;

use config::{Settings, UploadConfig};
use services::{CompletionProvider, ConversationStore, LlmService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,prompt_relay_server=debug".to_string()),
        )
        .with_target(true)
        .init();

    info!("Starting prompt relay server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("Configuration loaded");

    // Conversation store lives for the whole process; injected into the
    // relay handler rather than held as a global.
    let store = Arc::new(ConversationStore::new(
        settings.conversations.max_conversations,
        settings.conversations.max_messages,
    ));

    let provider: Arc<dyn CompletionProvider> = Arc::new(LlmService::new(settings.llm.clone()));
    let upload_config = Arc::new(settings.uploads.clone());

    // Build router
    let app = build_router(store, provider, upload_config, &settings);

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(
    store: Arc<ConversationStore>,
    provider: Arc<dyn CompletionProvider>,
    upload_config: Arc<UploadConfig>,
    settings: &Settings,
) -> Router {
    // Upload route carries its own body ceiling.
    let upload_routes = Router::new()
        .route("/upload", post(handlers::upload::upload_handler))
        .layer(DefaultBodyLimit::max(upload_config.max_size_bytes))
        .layer(Extension(upload_config));

    Router::new()
        .route(
            "/get-prompt-result",
            post(handlers::chat::prompt_result_handler),
        )
        .route("/health", get(handlers::health::health_check))
        .merge(upload_routes)
        // All other paths serve the client bundle.
        .fallback_service(ServeDir::new(&settings.server.static_dir))
        .layer(Extension(store))
        .layer(Extension(provider))
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
