mod config;
mod errors;
mod evaluation;
mod interview;
mod llm_client;
mod models;
mod research;
mod routes;
mod search;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::compliance::Denylist;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::search::{NullSearchProvider, SearchProvider, WebSearchClient};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Rehearse API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize search backend. Without SEARCH_ENDPOINT the research stage
    // still runs, with every report degrading to profile-derived content.
    let search: Arc<dyn SearchProvider> = match &config.search_endpoint {
        Some(endpoint) => {
            info!("Search backend: {endpoint}");
            Arc::new(WebSearchClient::new(endpoint.clone()))
        }
        None => {
            info!("SEARCH_ENDPOINT not set; research will run without web results");
            Arc::new(NullSearchProvider)
        }
    };

    // Compliance denylist (built-ins plus DENYLIST_EXTRA terms)
    let denylist = Arc::new(Denylist::with_extra(&config.denylist_extra));

    // Build app state
    let state = AppState {
        llm,
        search,
        config: config.clone(),
        denylist,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
