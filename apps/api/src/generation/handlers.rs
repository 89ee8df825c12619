//! Axum route handlers for the tailoring pipeline.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::generation::orchestrator::TailorResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub text: String,
    /// Posting URL. Accepted for client compatibility; the job text must be supplied in `text`.
    #[serde(default)]
    pub url: Option<String>,
}

/// POST /api/v1/tailor
///
/// Runs analysis, retrieval, synthesis and ATS scoring for one job description.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResult>, AppError> {
    if let Some(url) = &request.url {
        debug!("Ignoring job posting URL {url}; using supplied text");
    }

    let result = state.orchestrator.tailor_resume(&request.text).await?;
    Ok(Json(result))
}
