//! Axum route handlers for master resume ingestion.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::resume::extract::{extract_text_off_runtime, ResumeFormat};
use crate::resume::indexer::IngestReport;
use crate::state::AppState;

/// Multipart field carrying the uploaded resume.
const UPLOAD_FIELD: &str = "resume_file";

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CollectionStatusResponse {
    pub collection: String,
    pub chunk_count: usize,
}

/// POST /api/v1/resume/ingest
///
/// Ingests raw master-resume text, replacing any previously ingested resume.
pub async fn handle_ingest(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestReport>, AppError> {
    let report = state.orchestrator.ingest_master_resume(&request.text).await?;
    Ok(Json(report))
}

/// POST /api/v1/resume/upload
///
/// Accepts a `.txt`, `.md` or `.pdf` file in the `resume_file` multipart field.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestReport>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let format = ResumeFormat::from_filename(&file_name).ok_or_else(|| {
            AppError::Validation(
                "Only .txt, .md, or .pdf files are supported for resume upload.".to_string(),
            )
        })?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let byte_count = bytes.len();
        let text = extract_text_off_runtime(format, bytes).await?;
        if text.is_empty() {
            return Err(AppError::Validation(
                "The uploaded file appears to be empty or could not be processed.".to_string(),
            ));
        }

        info!("Ingesting uploaded resume '{file_name}' ({format:?}, {byte_count} bytes)");
        let report = state.orchestrator.ingest_master_resume(&text).await?;
        return Ok(Json(report));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{UPLOAD_FIELD}' is required"
    )))
}

/// GET /api/v1/resume/status
pub async fn handle_status(
    State(state): State<AppState>,
) -> Result<Json<CollectionStatusResponse>, AppError> {
    let indexer = state.orchestrator.indexer();
    let chunk_count = indexer.stored_chunk_count().await?;

    Ok(Json(CollectionStatusResponse {
        collection: indexer.collection().to_string(),
        chunk_count,
    }))
}
