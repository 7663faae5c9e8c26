mod config;
mod errors;
mod evaluation;
mod llm_client;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OpenRouterClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Match Evaluator v{}", env!("CARGO_PKG_VERSION"));

    let store = Store::new(config.data_file.clone());
    info!("Persisting form state to {}", config.data_file.display());

    let evaluator = Arc::new(OpenRouterClient::new());
    info!(
        "LLM client initialized (default model: {})",
        llm_client::DEFAULT_MODEL
    );
    if config.openrouter_api_key.is_none() {
        info!("OPENROUTER_API_KEY not set; enter a key in the form instead");
    }

    let state = AppState {
        config: config.clone(),
        store,
        evaluator,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Single-user local tool: bind loopback only.
    let addr: SocketAddr = format!("127.0.0.1:{}", config.port).parse()?;
    info!("Open http://{addr} in your browser");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
