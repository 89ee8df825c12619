use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::resume::{ChunkRow, ResumeChunk};
use crate::vector_store::{rank_by_similarity, StoreError, VectorStore};

const CREATE_COLLECTIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS resume_collections (
        name        TEXT PRIMARY KEY,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_CHUNKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS resume_chunks (
        collection  TEXT NOT NULL REFERENCES resume_collections(name) ON DELETE CASCADE,
        chunk_id    TEXT NOT NULL,
        document    TEXT NOT NULL,
        embedding   REAL[] NOT NULL,
        inserted_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (collection, chunk_id)
    )
"#;

/// PostgreSQL-backed vector store. Embeddings are stored as `REAL[]` and ranked
/// in process, which is plenty for a single master resume.
#[derive(Clone)]
pub struct PgVectorStore {
    pool: PgPool,
}

impl PgVectorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the tables if they are missing. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_COLLECTIONS_TABLE)
            .execute(&self.pool)
            .await?;
        sqlx::query(CREATE_CHUNKS_TABLE).execute(&self.pool).await?;
        info!("Vector store schema ready");
        Ok(())
    }

    async fn load_chunks(&self, collection: &str) -> Result<Vec<ResumeChunk>, StoreError> {
        let rows = sqlx::query_as::<_, ChunkRow>(
            r#"
            SELECT chunk_id, document, embedding
            FROM resume_chunks
            WHERE collection = $1
            ORDER BY inserted_at, length(chunk_id), chunk_id
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ResumeChunk::from).collect())
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn replace_collection(&self, collection: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Chunks go with the collection row via ON DELETE CASCADE.
        let deleted = sqlx::query("DELETE FROM resume_collections WHERE name = $1")
            .bind(collection)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("INSERT INTO resume_collections (name) VALUES ($1)")
            .bind(collection)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if deleted == 0 {
            info!("Collection '{collection}' did not exist; created it");
        } else {
            info!("Recreated collection '{collection}'");
        }
        Ok(())
    }

    async fn add(&self, collection: &str, chunk: &ResumeChunk) -> Result<(), StoreError> {
        let exists: Option<String> =
            sqlx::query_scalar("SELECT name FROM resume_collections WHERE name = $1")
                .bind(collection)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_none() {
            return Err(StoreError::MissingCollection(collection.to_string()));
        }

        let stored_dimension = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT array_length(embedding, 1) FROM resume_chunks WHERE collection = $1 LIMIT 1",
        )
        .bind(collection)
        .fetch_optional(&self.pool)
        .await?
        .flatten();

        if let Some(expected) = stored_dimension {
            let expected = expected as usize;
            if expected != chunk.embedding.len() {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    actual: chunk.embedding.len(),
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO resume_chunks (collection, chunk_id, document, embedding)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(collection)
        .bind(&chunk.id)
        .bind(&chunk.text)
        .bind(&chunk.embedding)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<String>, StoreError> {
        let chunks = self.load_chunks(collection).await?;
        rank_by_similarity(&chunks, embedding, top_n)
    }

    async fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM resume_chunks WHERE collection = $1")
                .bind(collection)
                .fetch_one(&self.pool)
                .await?;
        Ok(count as usize)
    }
}
