//! Vector index backends.
//!
//! The store is an opaque external similarity index: it keeps
//! `(id, vector, metadata)` triples, supports insert-or-replace by id, and
//! answers k-nearest-neighbour queries by vector similarity. [`VectorStore`]
//! abstracts over implementations so the pipeline can run against the
//! hosted index in production and the in-memory cosine store in tests.

pub mod memory;
pub mod pinecone;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{ChunkMetadata, RagError};

pub use memory::InMemoryVectorStore;
pub use pinecone::PineconeIndex;

/// One vector ready for upsert, in the index wire shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: ChunkMetadata,
}

/// One k-NN match. `metadata` may be absent or partial; callers must not
/// fail on that.
#[derive(Clone, Debug, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<ChunkMetadata>,
}

/// Similarity index contract.
///
/// Implementations must be safe for concurrent use; the core adds no
/// locking beyond what the backend itself guarantees, and concurrent
/// ingestion of overlapping content may produce duplicate vectors.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Vector dimension the index is configured for. Every upserted or
    /// queried vector must have exactly this length.
    fn dimension(&self) -> usize;

    /// Inserts or replaces the given vectors in one batch.
    async fn upsert(&self, vectors: Vec<VectorRecord>) -> Result<(), RagError>;

    /// Returns up to `top_k` matches ordered by similarity, descending.
    /// An empty result is not an error.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, RagError>;
}
