mod ats;
mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;
mod vector_store;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::connect_vector_store;
use crate::generation::orchestrator::TailoringOrchestrator;
use crate::llm_client::OllamaClient;
use crate::resume::indexer::ResumeIndexer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vector_store::{InMemoryVectorStore, VectorStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; only malformed values fail here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Ollama client (generation + embeddings)
    let ollama = OllamaClient::new(&config)?;
    info!(
        "Ollama client initialized (host: {}, model: {}, embeddings: {})",
        config.ollama_host,
        ollama.model(),
        ollama.embedding_model()
    );

    // Initialize vector store
    let store = build_vector_store(&config).await?;

    let llm = Arc::new(ollama.clone());
    let indexer = Arc::new(ResumeIndexer::new(
        llm.clone(),
        store,
        config.collection_name.clone(),
    ));
    let orchestrator = Arc::new(TailoringOrchestrator::new(indexer, llm));

    // Build app state
    let state = AppState {
        orchestrator,
        ollama,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-process store that
/// forgets the resume on restart.
async fn build_vector_store(config: &Config) -> Result<Arc<dyn VectorStore>> {
    match &config.database_url {
        Some(url) => {
            let store = connect_vector_store(url).await?;
            info!("Vector store: PostgreSQL");
            Ok(Arc::new(store))
        }
        None => {
            info!("Vector store: in-memory (set DATABASE_URL to persist)");
            Ok(Arc::new(InMemoryVectorStore::new()))
        }
    }
}
