use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the resume tailoring API. Status: running."
    }))
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "tailor-api"
    }))
}

#[derive(Debug, Serialize)]
pub struct ModelsStatusResponse {
    pub ollama_running: bool,
    pub host: String,
    pub available_models: Vec<String>,
    /// Configured generation and embedding models, and whether each is pulled.
    pub required_models: BTreeMap<String, bool>,
}

/// Ollama reports untagged pulls as `name:latest`.
pub fn model_available(required: &str, available: &[String]) -> bool {
    available.iter().any(|name| {
        name == required
            || (!required.contains(':')
                && name
                    .strip_suffix(":latest")
                    .is_some_and(|base| base == required))
    })
}

/// GET /api/v1/models/status
///
/// 503 when the Ollama daemon cannot be reached.
pub async fn handle_models_status(
    State(state): State<AppState>,
) -> Result<Json<ModelsStatusResponse>, AppError> {
    let available_models = state.ollama.list_models().await.map_err(|e| {
        AppError::Unavailable(format!(
            "Ollama check failed: {e}. Is Ollama running with the models pulled?"
        ))
    })?;

    let required_models = [state.ollama.model(), state.ollama.embedding_model()]
        .into_iter()
        .map(|model| (model.to_string(), model_available(model, &available_models)))
        .collect();

    Ok(Json(ModelsStatusResponse {
        ollama_running: true,
        host: state.config.ollama_host.clone(),
        available_models,
        required_models,
    }))
}
