//! Core domain types and the crate-wide error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the retrieval pipeline and its collaborators.
///
/// `Config` is fatal at startup: the process must refuse to serve requests
/// rather than run with invalid chunk parameters or missing credentials.
/// Everything else is a per-request failure surfaced to the caller. Note
/// that "no relevant context found" is *not* an error; it is modelled as
/// [`crate::pipeline::AskOutcome::NoContext`].
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid configuration (chunk parameters, missing credentials).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Embedding capability unreachable or returned mismatched dimensions.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Vector store upsert/query failure (transport, auth, quota).
    #[error("vector store failure: {0}")]
    Store(String),

    /// Rerank capability failure. Constructed by rerank backends; the
    /// pipeline stage degrades to pass-through instead of propagating it.
    #[error("rerank failed: {0}")]
    Rerank(String),

    /// Generation capability failure; no partial answer is returned.
    #[error("generation failed: {0}")]
    Generation(String),

    /// An external capability call exceeded its deadline.
    #[error("request timed out: {0}")]
    Timeout(String),
}

impl RagError {
    /// Maps a transport error onto the right variant, routing elapsed
    /// deadlines to [`RagError::Timeout`].
    pub(crate) fn transport(err: reqwest::Error, wrap: fn(String) -> RagError) -> Self {
        if err.is_timeout() {
            RagError::Timeout(err.to_string())
        } else {
            wrap(err.to_string())
        }
    }
}

/// A contiguous word-window slice of a source document.
///
/// Positions are 0-based and contiguous in emission order within a single
/// ingested document; they are used downstream only for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub position: usize,
}

/// Metadata stored alongside each vector and echoed back by queries.
///
/// All fields default so a match with partial or absent metadata never
/// fails deserialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub position: usize,
    #[serde(default)]
    pub text: String,
}

/// A candidate chunk returned by the vector store for a query.
///
/// Transient, produced per query; `score` is the store's similarity
/// (higher = closer).
#[derive(Clone, Debug)]
pub struct RetrievedDoc {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
}

/// A retrieved doc after the rerank stage.
///
/// `rerank_score` is `Some` when the external reranker scored the doc and
/// `None` on the pass-through degradation path. The order of the sequence
/// holding these docs is the authoritative relevance order either way.
#[derive(Clone, Debug)]
pub struct RerankedDoc {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
    pub rerank_score: Option<f32>,
}

impl RerankedDoc {
    /// Attach an external relevance score to a retrieved doc.
    pub fn scored(doc: RetrievedDoc, rerank_score: f32) -> Self {
        Self {
            id: doc.id,
            text: doc.text,
            metadata: doc.metadata,
            score: doc.score,
            rerank_score: Some(rerank_score),
        }
    }

    /// Carry a retrieved doc through unchanged (degraded ranking).
    pub fn passthrough(doc: RetrievedDoc) -> Self {
        Self {
            id: doc.id,
            text: doc.text,
            metadata: doc.metadata,
            score: doc.score,
            rerank_score: None,
        }
    }
}
