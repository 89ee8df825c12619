//! Resume Indexer: owns the master-resume collection.
//!
//! Ingestion replaces the whole collection; retrieval reads it. Both go through
//! `guard`, so a query never observes a half-written collection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::{AppError, StageError, StageOutput};
use crate::llm_client::Embedder;
use crate::models::resume::ResumeChunk;
use crate::resume::chunker::chunk_resume;
use crate::vector_store::VectorStore;

/// Chunks returned per retrieval unless the caller asks otherwise.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    Success,
    /// Nothing survived filtering or embedding; the collection is empty.
    NoValidChunks,
}

/// Outcome of one master-resume ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub status: IngestStatus,
    pub message: String,
    /// Chunks that survived the length filter.
    pub chunk_count: usize,
    /// Chunks actually embedded and stored.
    pub stored_count: usize,
    pub collection: String,
    pub ingested_at: DateTime<Utc>,
}

pub struct ResumeIndexer {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    collection: String,
    guard: RwLock<()>,
}

impl ResumeIndexer {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            store,
            collection: collection.into(),
            guard: RwLock::new(()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Chunks, embeds and stores `resume_text`, replacing whatever was there before.
    ///
    /// A chunk whose embedding (or insert) fails is skipped, not fatal.
    /// Only blank input and a failure to recreate the collection are errors.
    pub async fn ingest(&self, resume_text: &str) -> Result<IngestReport, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::EmptyInput(
                "resume text cannot be empty".to_string(),
            ));
        }

        let chunks = chunk_resume(resume_text);
        info!("Chunked resume into {} pieces", chunks.len());

        let _write = self.guard.write().await;

        self.store.replace_collection(&self.collection).await?;
        info!("Replaced collection '{}'", self.collection);

        let mut stored_count = 0;
        for (index, text) in chunks.iter().enumerate() {
            let embedding = match self.embedder.embed(text).await {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!("Embedding failed for chunk {index}, skipping: {e}");
                    continue;
                }
            };

            let chunk = ResumeChunk {
                id: ResumeChunk::chunk_id(index),
                text: text.clone(),
                embedding,
            };

            if let Err(e) = self.store.add(&self.collection, &chunk).await {
                warn!("Storing chunk {} failed, skipping: {e}", chunk.id);
                continue;
            }
            stored_count += 1;
        }

        let (status, message) = if stored_count == 0 {
            warn!("No valid chunks or embeddings to store");
            (
                IngestStatus::NoValidChunks,
                "No valid chunks or embeddings to store; the collection is empty.".to_string(),
            )
        } else {
            info!(
                "Resume ingestion complete: {stored_count}/{} chunks stored",
                chunks.len()
            );
            (
                IngestStatus::Success,
                "Resume ingested successfully.".to_string(),
            )
        };

        Ok(IngestReport {
            status,
            message,
            chunk_count: chunks.len(),
            stored_count,
            collection: self.collection.clone(),
            ingested_at: Utc::now(),
        })
    }

    /// Returns up to `top_n` stored chunks nearest to `query_text`, most similar first.
    /// Embedding or store failures degrade to an empty list.
    pub async fn retrieve(&self, query_text: &str, top_n: usize) -> StageOutput<Vec<String>> {
        StageOutput::recover(
            self.try_retrieve(query_text, top_n).await,
            "Relevance retrieval",
            Vec::new,
        )
    }

    async fn try_retrieve(&self, query_text: &str, top_n: usize) -> Result<Vec<String>, StageError> {
        info!("Querying collection '{}' for: '{query_text}'", self.collection);

        let embedding = self.embedder.embed(query_text).await?;

        let _read = self.guard.read().await;
        let documents = self
            .store
            .query(&self.collection, &embedding, top_n)
            .await?;

        info!("Retrieved {} relevant chunks", documents.len());
        Ok(documents)
    }

    /// Number of chunks in the collection right now.
    pub async fn stored_chunk_count(&self) -> Result<usize, AppError> {
        let _read = self.guard.read().await;
        Ok(self.store.count(&self.collection).await?)
    }
}
