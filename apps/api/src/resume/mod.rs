// Master resume ingestion and retrieval.
// Chunking is pure; the indexer owns the vector store collection.

pub mod chunker;
pub mod extract;
pub mod handlers;
pub mod indexer;
