//! End-to-end question answering: retrieve → rerank → compose → generate.

use std::time::{Duration, Instant};

use crate::generation::Answerer;
use crate::rerank::RerankStage;
use crate::retrieval::Retriever;
use crate::types::{RagError, RerankedDoc};

/// Citation handle for one context chunk used in an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRef {
    pub source: String,
    pub position: usize,
}

/// Terminal outcome of [`RagPipeline::ask`].
///
/// `NoContext` is a first-class user-visible state, not an error: the
/// reranked candidate set was empty and the generation capability was
/// never invoked.
#[derive(Clone, Debug)]
pub enum AskOutcome {
    Answered {
        answer: String,
        sources: Vec<SourceRef>,
        elapsed: Duration,
    },
    NoContext {
        elapsed: Duration,
    },
}

/// The ask pipeline. Owns its collaborators; everything is injected at
/// construction so tests can substitute fakes.
pub struct RagPipeline {
    retriever: Retriever,
    rerank: RerankStage,
    answerer: Answerer,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        retriever: Retriever,
        rerank: RerankStage,
        answerer: Answerer,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            rerank,
            answerer,
            top_k,
        }
    }

    /// Answers `question` from ingested context, with wall-clock timing
    /// around the retrieve + rerank + answer sequence.
    pub async fn ask(&self, question: &str) -> Result<AskOutcome, RagError> {
        let start = Instant::now();

        let docs = self.retriever.retrieve(question, self.top_k).await?;
        let reranked = self.rerank.rerank(question, docs).await;

        if reranked.is_empty() {
            tracing::info!(question, "no relevant context found");
            return Ok(AskOutcome::NoContext {
                elapsed: start.elapsed(),
            });
        }

        let context = compose_context(&reranked);
        let answer = self.answerer.answer(question, &context).await?;
        let sources = reranked
            .iter()
            .map(|doc| SourceRef {
                source: doc.metadata.source.clone(),
                position: doc.metadata.position,
            })
            .collect();

        let elapsed = start.elapsed();
        tracing::info!(question, elapsed_ms = elapsed.as_millis() as u64, "answered");
        Ok(AskOutcome::Answered {
            answer,
            sources,
            elapsed,
        })
    }
}

/// Concatenates reranked texts in relevance order with blank-line
/// separators.
pub fn compose_context(docs: &[RerankedDoc]) -> String {
    docs.iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkMetadata, RerankedDoc};

    fn reranked(text: &str) -> RerankedDoc {
        RerankedDoc {
            id: "id".into(),
            text: text.into(),
            metadata: ChunkMetadata::default(),
            score: 0.5,
            rerank_score: Some(0.9),
        }
    }

    #[test]
    fn context_joins_texts_with_blank_lines() {
        let docs = vec![reranked("first chunk"), reranked("second chunk")];
        assert_eq!(compose_context(&docs), "first chunk\n\nsecond chunk");
    }

    #[test]
    fn empty_docs_compose_empty_context() {
        assert_eq!(compose_context(&[]), "");
    }
}
