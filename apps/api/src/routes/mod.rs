pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers as tailoring;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Uploaded PDFs routinely exceed axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Master resume
        .route("/api/v1/resume/ingest", post(resume::handle_ingest))
        .route(
            "/api/v1/resume/upload",
            post(resume::handle_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/resume/status", get(resume::handle_status))
        // Tailoring
        .route("/api/v1/tailor", post(tailoring::handle_tailor))
        // Model server
        .route(
            "/api/v1/models/status",
            get(health::handle_models_status),
        )
        .with_state(state)
}
