use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One atomic, retrievable unit of the master resume (a single non-trivial line).
/// Immutable once stored; the whole set is replaced on re-ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeChunk {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

impl ResumeChunk {
    /// Chunk ids follow the chunk's position in the filtered sequence.
    pub fn chunk_id(index: usize) -> String {
        format!("resume_chunk_{index}")
    }
}

/// Row shape of `resume_chunks` in the PostgreSQL vector store.
#[derive(Debug, Clone, FromRow)]
pub struct ChunkRow {
    pub chunk_id: String,
    pub document: String,
    pub embedding: Vec<f32>,
}

impl From<ChunkRow> for ResumeChunk {
    fn from(row: ChunkRow) -> Self {
        ResumeChunk {
            id: row.chunk_id,
            text: row.document,
            embedding: row.embedding,
        }
    }
}
