//! Second-pass relevance scoring over retrieved candidates.
//!
//! [`RerankBackend`] is the opaque external capability; [`RerankStage`]
//! owns the pipeline-facing behaviour: pass-through when no backend is
//! configured or the candidate list is empty, index mapping and truncation
//! on success, and degradation to pass-through when the backend fails.

pub mod cohere;

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{RagError, RerankedDoc, RetrievedDoc};

pub use cohere::CohereReranker;

/// One scored hit from the external capability; `index` points into the
/// submitted document list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedHit {
    pub index: usize,
    pub relevance_score: f32,
}

/// External rerank capability: scores `documents` against `query` and
/// returns hits in descending relevance order.
#[async_trait]
pub trait RerankBackend: Send + Sync {
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RankedHit>, RagError>;
}

/// Pipeline rerank stage.
///
/// The backend is trusted to return results in descending relevance order;
/// this stage never re-sorts, it only maps hits back to their originating
/// docs and truncates to `top_n`. Backend transport failures degrade to
/// pass-through ranking rather than failing the request.
pub struct RerankStage {
    backend: Option<Arc<dyn RerankBackend>>,
    top_n: usize,
}

impl RerankStage {
    pub fn new(backend: Arc<dyn RerankBackend>, top_n: usize) -> Self {
        Self {
            backend: Some(backend),
            top_n,
        }
    }

    /// A stage with no external capability; always passes candidates
    /// through in retrieval order.
    pub fn passthrough(top_n: usize) -> Self {
        Self {
            backend: None,
            top_n,
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Reranks `docs` for `query`. Returns at most `top_n` docs; the output
    /// order is the authoritative relevance order.
    pub async fn rerank(&self, query: &str, docs: Vec<RetrievedDoc>) -> Vec<RerankedDoc> {
        let Some(backend) = &self.backend else {
            return pass_through(docs, self.top_n);
        };
        if docs.is_empty() {
            return Vec::new();
        }

        let documents: Vec<String> = docs.iter().map(|d| d.text.clone()).collect();
        match backend.rerank(query, &documents, self.top_n).await {
            Ok(hits) => {
                let mut docs: Vec<Option<RetrievedDoc>> = docs.into_iter().map(Some).collect();
                let mut reranked = Vec::new();
                for hit in hits {
                    let Some(slot) = docs.get_mut(hit.index) else {
                        tracing::warn!(index = hit.index, "reranker returned out-of-range index");
                        continue;
                    };
                    if let Some(doc) = slot.take() {
                        reranked.push(RerankedDoc::scored(doc, hit.relevance_score));
                    }
                    if reranked.len() == self.top_n {
                        break;
                    }
                }
                reranked
            }
            Err(err) => {
                tracing::warn!(error = %err, "rerank failed, falling back to retrieval order");
                pass_through(docs, self.top_n)
            }
        }
    }
}

fn pass_through(docs: Vec<RetrievedDoc>, top_n: usize) -> Vec<RerankedDoc> {
    docs.into_iter()
        .take(top_n)
        .map(RerankedDoc::passthrough)
        .collect()
}
