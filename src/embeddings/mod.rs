//! Embedding capability: text in, fixed-dimension vector out.
//!
//! The embedder is an opaque external capability behind
//! [`EmbeddingProvider`]. Implementations must be safe for concurrent
//! read-only use; a provider is constructed once and shared via `Arc`
//! across requests.

pub mod http;

use async_trait::async_trait;

use crate::types::RagError;

pub use http::HttpEmbeddingProvider;

/// Maps text to fixed-dimension numeric vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Output dimension of every vector this provider produces.
    fn dimension(&self) -> usize;

    /// Embeds a batch of inputs, preserving order.
    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError>;

    /// Embeds a single input.
    async fn embed(&self, input: &str) -> Result<Vec<f32>, RagError> {
        let inputs = [input.to_string()];
        let mut vectors = self.embed_batch(&inputs).await?;
        vectors
            .pop()
            .ok_or_else(|| RagError::Embedding("provider returned no vector".into()))
    }
}

/// Deterministic bag-of-words embedder for tests and offline runs.
///
/// Tokens are hashed into buckets and the resulting vector is
/// L2-normalized, so texts sharing words land close under cosine
/// similarity while identical inputs always produce identical vectors.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimension: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self { dimension: 384 }
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, input: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in input
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty())
        {
            let bucket = (fnv1a(token.as_bytes()) as usize) % self.dimension;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(inputs.iter().map(|input| self.embed_one(input)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
