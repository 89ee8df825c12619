use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::llm_client::LlmError;
use crate::vector_store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Only input problems and infrastructure failures outside the tailoring stages
/// surface here. Model failures inside a stage are recovered via `StageOutput`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Vector store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::EmptyInput(msg) => (StatusCode::BAD_REQUEST, "EMPTY_INPUT", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unavailable(msg) => {
                tracing::error!("Upstream service unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::Store(e) => {
                tracing::error!("Vector store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "VECTOR_STORE_ERROR",
                    "A vector store error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage-level failures
// ────────────────────────────────────────────────────────────────────────────

/// Failure inside a single pipeline stage. Never leaves the stage as an error:
/// the stage swaps in its documented default and records the cause.
#[derive(Debug, Clone, Error)]
pub enum StageError {
    /// The embedding or generation call failed.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The model answered, but the expected JSON was missing or invalid.
    #[error("malformed model output: {0}")]
    MalformedModelOutput(String),
}

impl From<LlmError> for StageError {
    fn from(e: LlmError) -> Self {
        StageError::ServiceUnavailable(e.to_string())
    }
}

impl From<StoreError> for StageError {
    fn from(e: StoreError) -> Self {
        StageError::ServiceUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for StageError {
    fn from(e: serde_json::Error) -> Self {
        StageError::MalformedModelOutput(e.to_string())
    }
}

/// A stage result that always carries a usable value.
/// `fallbacks` lists every failure the stage recovered from on the way.
#[derive(Debug, Clone)]
pub struct StageOutput<T> {
    pub value: T,
    pub fallbacks: Vec<StageError>,
}

impl<T> StageOutput<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            fallbacks: Vec::new(),
        }
    }

    /// Unwraps `result`, or logs the failure under `label` and substitutes `default`.
    pub fn recover(
        result: Result<T, StageError>,
        label: &str,
        default: impl FnOnce() -> T,
    ) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => {
                warn!("{label} degraded to default: {e}");
                Self {
                    value: default(),
                    fallbacks: vec![e],
                }
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.fallbacks.is_empty()
    }

    /// Moves the value out, appending recorded fallbacks to `sink`.
    pub fn collect_into(self, sink: &mut Vec<StageError>) -> T {
        sink.extend(self.fallbacks);
        self.value
    }
}
