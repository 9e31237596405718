//! Query-time retrieval: embed the question, k-NN against the store.

use std::sync::Arc;

use crate::embeddings::EmbeddingProvider;
use crate::stores::VectorStore;
use crate::types::{RagError, RetrievedDoc};

/// Orchestrates Embedder(query) → VectorStore.query(top_k).
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Returns up to `top_k` candidate docs ordered by similarity,
    /// descending, as returned by the store. Matches with absent or partial
    /// metadata are mapped with empty-string defaults rather than failing;
    /// an empty store yields an empty vec, not an error.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedDoc>, RagError> {
        let embedding = self.embedder.embed(query).await?;
        let expected = self.store.dimension();
        if embedding.len() != expected {
            return Err(RagError::Embedding(format!(
                "query embedding dimension {} does not match index dimension {expected}",
                embedding.len()
            )));
        }

        let matches = self.store.query(&embedding, top_k).await?;
        Ok(matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.unwrap_or_default();
                RetrievedDoc {
                    id: m.id,
                    text: metadata.text.clone(),
                    metadata,
                    score: m.score,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::ChunkingConfig;
    use crate::embeddings::MockEmbeddingProvider;
    use crate::ingestion::Ingestor;
    use crate::stores::{InMemoryVectorStore, VectorRecord};
    use crate::types::ChunkMetadata;

    #[tokio::test]
    async fn empty_store_returns_empty_sequence() {
        let embedder = Arc::new(MockEmbeddingProvider::with_dimension(32));
        let store = Arc::new(InMemoryVectorStore::new(32));
        let retriever = Retriever::new(embedder, store);

        let docs = retriever.retrieve("anything", 10).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn ingest_then_retrieve_round_trips_text() {
        let embedder = Arc::new(MockEmbeddingProvider::with_dimension(64));
        let store = Arc::new(InMemoryVectorStore::new(64));
        let ingestor = Ingestor::new(
            embedder.clone(),
            store.clone(),
            ChunkingConfig::new(50, 10),
        )
        .unwrap();

        ingestor
            .ingest("The sky is blue. Water is wet.", "test")
            .await
            .unwrap();
        ingestor
            .ingest("Quarterly revenue grew by five percent.", "other")
            .await
            .unwrap();

        let retriever = Retriever::new(embedder, store);
        let docs = retriever.retrieve("sky is blue", 2).await.unwrap();

        assert!(!docs.is_empty());
        assert!(docs[0].text.contains("sky is blue"));
        assert_eq!(docs[0].metadata.source, "test");
    }

    #[tokio::test]
    async fn missing_metadata_maps_to_empty_text() {
        let embedder = Arc::new(MockEmbeddingProvider::with_dimension(32));
        let store = Arc::new(InMemoryVectorStore::new(32));
        // A vector whose metadata carries no text.
        store
            .upsert(vec![VectorRecord {
                id: "bare".into(),
                values: embedder.embed("hello").await.unwrap(),
                metadata: ChunkMetadata::default(),
            }])
            .await
            .unwrap();

        let retriever = Retriever::new(embedder, store);
        let docs = retriever.retrieve("hello", 1).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "");
    }
}
