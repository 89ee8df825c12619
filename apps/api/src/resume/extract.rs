//! Text extraction for uploaded resume files.

use axum::body::Bytes;

use crate::errors::AppError;

/// Upload formats accepted for a master resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    PlainText,
    Markdown,
    Pdf,
}

impl ResumeFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_filename(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(ResumeFormat::PlainText),
            "md" => Some(ResumeFormat::Markdown),
            "pdf" => Some(ResumeFormat::Pdf),
            _ => None,
        }
    }
}

/// Extracts resume text from raw upload bytes.
pub fn extract_text(format: ResumeFormat, bytes: &[u8]) -> Result<String, AppError> {
    let text = match format {
        ResumeFormat::PlainText | ResumeFormat::Markdown => String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::Validation(format!("Resume file is not valid UTF-8: {e}")))?,
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Validation(format!("Failed to extract text from PDF: {e}")))?,
    };
    Ok(text.trim().to_string())
}

/// Runs `extract_text` on the blocking pool; PDF parsing is CPU-bound and may panic
/// on malformed input.
pub async fn extract_text_off_runtime(
    format: ResumeFormat,
    bytes: Bytes,
) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extract_text(format, &bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in text extraction: {e}")))?
}
