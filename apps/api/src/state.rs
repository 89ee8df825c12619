use std::sync::Arc;

use crate::config::Config;
use crate::generation::orchestrator::TailoringOrchestrator;
use crate::llm_client::OllamaClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TailoringOrchestrator>,
    /// Concrete client, kept for the model status endpoint. Pipeline stages see it
    /// only through the `TextGenerator` / `Embedder` traits.
    pub ollama: OllamaClient,
    pub config: Config,
}
