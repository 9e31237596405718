//! In-memory cosine-similarity store.
//!
//! Used as the contract-test fake and for credential-less local runs. Exact
//! cosine ranking over a flat list; good enough far beyond the document
//! counts this service sees in tests.

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{VectorMatch, VectorRecord, VectorStore};
use crate::types::RagError;

pub struct InMemoryVectorStore {
    dimension: usize,
    rows: RwLock<Vec<VectorRecord>>,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Number of vectors currently held.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, vectors: Vec<VectorRecord>) -> Result<(), RagError> {
        for record in &vectors {
            if record.values.len() != self.dimension {
                return Err(RagError::Store(format!(
                    "vector '{}' has dimension {}, index is configured for {}",
                    record.id,
                    record.values.len(),
                    self.dimension
                )));
            }
        }

        let mut rows = self.rows.write();
        for record in vectors {
            if let Some(existing) = rows.iter_mut().find(|row| row.id == record.id) {
                *existing = record;
            } else {
                rows.push(record);
            }
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, RagError> {
        if vector.len() != self.dimension {
            return Err(RagError::Store(format!(
                "query vector has dimension {}, index is configured for {}",
                vector.len(),
                self.dimension
            )));
        }

        let rows = self.rows.read();
        let mut scored: Vec<VectorMatch> = rows
            .iter()
            .map(|row| VectorMatch {
                id: row.id.clone(),
                score: cosine_similarity(vector, &row.values),
                metadata: Some(row.metadata.clone()),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;

    fn record(id: &str, values: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            values,
            metadata: ChunkMetadata {
                source: "test".into(),
                position: 0,
                text: id.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn query_orders_by_similarity_descending() {
        let store = InMemoryVectorStore::new(2);
        store
            .upsert(vec![
                record("far", vec![0.0, 1.0]),
                record("near", vec![1.0, 0.0]),
                record("mid", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let matches = store.query(&[1.0, 0.0], 3).await.unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
    }

    #[tokio::test]
    async fn top_k_truncates_results() {
        let store = InMemoryVectorStore::new(2);
        store
            .upsert(vec![
                record("a", vec![1.0, 0.0]),
                record("b", vec![0.9, 0.1]),
                record("c", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let matches = store.query(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_id() {
        let store = InMemoryVectorStore::new(2);
        store.upsert(vec![record("a", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(vec![record("a", vec![0.0, 1.0])]).await.unwrap();

        assert_eq!(store.len(), 1);
        let matches = store.query(&[0.0, 1.0], 1).await.unwrap();
        assert!(matches[0].score > 0.99);
    }

    #[tokio::test]
    async fn dimension_mismatch_is_a_store_error() {
        let store = InMemoryVectorStore::new(3);
        let result = store.upsert(vec![record("a", vec![1.0, 0.0])]).await;
        assert!(matches!(result, Err(RagError::Store(_))));

        let result = store.query(&[1.0, 0.0], 1).await;
        assert!(matches!(result, Err(RagError::Store(_))));
    }

    #[tokio::test]
    async fn empty_store_returns_no_matches() {
        let store = InMemoryVectorStore::new(2);
        let matches = store.query(&[1.0, 0.0], 5).await.unwrap();
        assert!(matches.is_empty());
    }
}
