//! Personal AI tutor service
//!
//! A Rust backend implementing the conversation orchestration engine for
//! a personalized tutoring companion: per-request runs that collate
//! retrieved context, generate pedagogically-shaped replies, and dispatch
//! tool calls until a terminal answer is produced.

mod api;
mod db;
mod engine;
mod events;
mod llm;
mod memory;
mod report;
mod tools;

use api::{create_router, AppState};
use db::Database;
use llm::{LoggingClient, ModelClient, OpenAiClient, DEFAULT_MODEL};
use memory::{HttpMemoryProvider, MemoryProvider, NoopMemoryProvider};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tools::SearchConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 3006;
const DEFAULT_RUN_TIMEOUT_SECS: u64 = 120;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_agent=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let db_path = std::env::var("TUTOR_DB_PATH").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        format!("{home}/.tutor-agent/tutor.db")
    });

    let port: u16 = std::env::var("TUTOR_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let run_timeout = Duration::from_secs(
        std::env::var("TUTOR_RUN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RUN_TIMEOUT_SECS),
    );

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    tracing::info!(path = %db_path, "Opening database");
    let db = Database::open(&db_path)?;

    // Model capability
    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY not set; chat runs will fail until configured");
    }
    let model_name = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let base_url = std::env::var("OPENAI_BASE_URL").ok();
    let model: Arc<dyn ModelClient> = Arc::new(LoggingClient::new(Arc::new(OpenAiClient::new(
        api_key,
        model_name,
        base_url.as_deref(),
    ))));
    tracing::info!(model = %model.model_id(), "Model capability initialized");

    // Memory provider
    let memory: Arc<dyn MemoryProvider> = match std::env::var("MEMORY_SERVICE_URL") {
        Ok(url) if !url.is_empty() => Arc::new(HttpMemoryProvider::new(url)),
        _ => {
            tracing::warn!("MEMORY_SERVICE_URL not set; context collation degrades to empty");
            Arc::new(NoopMemoryProvider)
        }
    };

    // Search backend (optional)
    let search = std::env::var("TAVILY_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .map(|key| {
            let config = SearchConfig::new(key);
            match std::env::var("TAVILY_BASE_URL") {
                Ok(url) if !url.is_empty() => config.with_base_url(url),
                _ => config,
            }
        });
    if search.is_none() {
        tracing::warn!("TAVILY_API_KEY not set; web search tool disabled");
    }

    // Create application state
    let state = AppState::new(db, memory, model, search, run_timeout);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Tutor service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
