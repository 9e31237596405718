//! Document ingestion: chunk, embed, upsert.

use std::sync::Arc;

use uuid::Uuid;

use crate::chunking::{ChunkingConfig, split_text};
use crate::embeddings::EmbeddingProvider;
use crate::stores::{VectorRecord, VectorStore};
use crate::types::{ChunkMetadata, RagError};

/// Summary of one ingest call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestReport {
    /// Chunks embedded and upserted.
    pub chunks: usize,
}

/// Orchestrates Chunker → Embedder → VectorStore.upsert.
///
/// No deduplication is performed against existing content; ingesting the
/// same text twice creates redundant vectors. The only side effect is the
/// mutation of the vector store; no local state is retained.
pub struct Ingestor {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chunking: ChunkingConfig,
}

impl Ingestor {
    /// Builds an ingestor, rejecting invalid chunk parameters up front.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        chunking: ChunkingConfig,
    ) -> Result<Self, RagError> {
        chunking.validate()?;
        Ok(Self {
            embedder,
            store,
            chunking,
        })
    }

    /// Ingests `text` under the given `source` label.
    ///
    /// Each chunk gets a fresh UUID and `{source, position, text}` metadata,
    /// and the whole batch is upserted in a single store call. Embedding
    /// dimension is validated against the store before anything is written.
    pub async fn ingest(&self, text: &str, source: &str) -> Result<IngestReport, RagError> {
        let chunks = split_text(text, &self.chunking)?;
        if chunks.is_empty() {
            tracing::debug!(source, "nothing to ingest");
            return Ok(IngestReport { chunks: 0 });
        }

        let inputs: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&inputs).await?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::Embedding(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let expected = self.store.dimension();
        let mut vectors = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            if embedding.len() != expected {
                return Err(RagError::Embedding(format!(
                    "embedding dimension {} does not match index dimension {expected}",
                    embedding.len()
                )));
            }
            vectors.push(VectorRecord {
                id: Uuid::new_v4().to_string(),
                values: embedding,
                metadata: ChunkMetadata {
                    source: source.to_string(),
                    position: chunk.position,
                    text: chunk.text,
                },
            });
        }

        let count = vectors.len();
        self.store.upsert(vectors).await?;
        tracing::info!(source, chunks = count, "ingested document");
        Ok(IngestReport { chunks: count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::MockEmbeddingProvider;
    use crate::stores::InMemoryVectorStore;

    fn ingestor(store: Arc<InMemoryVectorStore>) -> Ingestor {
        Ingestor::new(
            Arc::new(MockEmbeddingProvider::with_dimension(32)),
            store,
            ChunkingConfig::new(4, 1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ingest_writes_one_vector_per_chunk() {
        let store = Arc::new(InMemoryVectorStore::new(32));
        let report = ingestor(store.clone())
            .ingest("one two three four five six seven", "doc")
            .await
            .unwrap();

        assert_eq!(report.chunks, 3);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn empty_text_ingests_nothing() {
        let store = Arc::new(InMemoryVectorStore::new(32));
        let report = ingestor(store.clone()).ingest("   ", "doc").await.unwrap();
        assert_eq!(report.chunks, 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn repeated_ingest_duplicates_vectors() {
        let store = Arc::new(InMemoryVectorStore::new(32));
        let ingestor = ingestor(store.clone());
        ingestor.ingest("same text here", "doc").await.unwrap();
        ingestor.ingest("same text here", "doc").await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn dimension_mismatch_fails_before_upsert() {
        let store = Arc::new(InMemoryVectorStore::new(64));
        let ingestor = Ingestor::new(
            Arc::new(MockEmbeddingProvider::with_dimension(32)),
            store.clone(),
            ChunkingConfig::default(),
        )
        .unwrap();

        let result = ingestor.ingest("some text", "doc").await;
        assert!(matches!(result, Err(RagError::Embedding(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn invalid_chunking_is_rejected_at_construction() {
        let result = Ingestor::new(
            Arc::new(MockEmbeddingProvider::with_dimension(32)),
            Arc::new(InMemoryVectorStore::new(32)),
            ChunkingConfig::new(10, 10),
        );
        assert!(matches!(result, Err(RagError::Config(_))));
    }
}
