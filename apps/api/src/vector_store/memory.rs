use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::resume::ResumeChunk;
use crate::vector_store::{rank_by_similarity, StoreError, VectorStore};

/// Process-local vector store. Collections vanish on restart.
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Vec<ResumeChunk>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn replace_collection(&self, collection: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections.remove(collection);
        collections.insert(collection.to_string(), Vec::new());
        Ok(())
    }

    async fn add(&self, collection: &str, chunk: &ResumeChunk) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let chunks = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::MissingCollection(collection.to_string()))?;

        if let Some(first) = chunks.first() {
            if first.embedding.len() != chunk.embedding.len() {
                return Err(StoreError::DimensionMismatch {
                    expected: first.embedding.len(),
                    actual: chunk.embedding.len(),
                });
            }
        }

        chunks.push(chunk.clone());
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read().await;
        match collections.get(collection) {
            Some(chunks) => rank_by_similarity(chunks, embedding, top_n),
            None => Ok(Vec::new()),
        }
    }

    async fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map_or(0, Vec::len))
    }
}
