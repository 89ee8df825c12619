//! Vector Store: named collections of `(id, document, embedding)` triples.
//!
//! Backends: `InMemoryVectorStore` (default, local-first) and `PgVectorStore`
//! (persistent, enabled by `DATABASE_URL`). Both rank by cosine similarity.
//!
//! The store does no locking of its own across calls; `ResumeIndexer` serialises
//! collection replacement against queries.

pub mod memory;
pub mod postgres;

use std::cmp::Ordering;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::resume::ResumeChunk;

pub use memory::InMemoryVectorStore;
pub use postgres::PgVectorStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Collection '{0}' does not exist")]
    MissingCollection(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Storage backend for embedded resume chunks.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Deletes `collection` if present and recreates it empty.
    async fn replace_collection(&self, collection: &str) -> Result<(), StoreError>;

    /// Inserts one chunk. The collection must exist.
    async fn add(&self, collection: &str, chunk: &ResumeChunk) -> Result<(), StoreError>;

    /// Returns up to `top_n` documents, most similar first.
    /// A missing or empty collection yields an empty vector.
    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<String>, StoreError>;

    /// Number of chunks currently stored in `collection` (0 if missing).
    async fn count(&self, collection: &str) -> Result<usize, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Similarity ranking (shared by both backends)
// ────────────────────────────────────────────────────────────────────────────

/// Cosine similarity of two equal-length vectors. Zero-norm vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f32, 0.0_f32, 0.0_f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Ranks `chunks` against `query` and returns the `top_n` documents.
/// Ties keep insertion order.
pub fn rank_by_similarity<'a, I>(
    chunks: I,
    query: &[f32],
    top_n: usize,
) -> Result<Vec<String>, StoreError>
where
    I: IntoIterator<Item = &'a ResumeChunk>,
{
    let mut scored = Vec::new();
    for chunk in chunks {
        if chunk.embedding.len() != query.len() {
            return Err(StoreError::DimensionMismatch {
                expected: chunk.embedding.len(),
                actual: query.len(),
            });
        }
        scored.push((cosine_similarity(&chunk.embedding, query), chunk));
    }

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    Ok(scored
        .into_iter()
        .take(top_n)
        .map(|(_, chunk)| chunk.text.clone())
        .collect())
}
