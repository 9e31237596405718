//! Cohere-style rerank client.
//!
//! Wire contract: `POST {base}/v1/rerank` with
//! `{ "model", "query", "documents", "top_n" }`, bearer-authenticated,
//! returning `{ "results": [{ "index", "relevance_score" }] }` in
//! descending relevance order.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{RankedHit, RerankBackend};
use crate::types::RagError;

#[derive(Clone)]
pub struct CohereReranker {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    #[serde(default)]
    results: Vec<RerankResult>,
}

#[derive(Deserialize)]
struct RerankResult {
    index: usize,
    relevance_score: f32,
}

impl CohereReranker {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl RerankBackend for CohereReranker {
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RankedHit>, RagError> {
        let response = self
            .client
            .post(format!("{}/v1/rerank", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&RerankRequest {
                model: &self.model,
                query,
                documents,
                top_n,
            })
            .send()
            .await
            .map_err(|err| RagError::transport(err, RagError::Rerank))?
            .error_for_status()
            .map_err(|err| RagError::Rerank(err.to_string()))?;

        let body: RerankResponse = response
            .json()
            .await
            .map_err(|err| RagError::Rerank(err.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .map(|result| RankedHit {
                index: result.index,
                relevance_score: result.relevance_score,
            })
            .collect())
    }
}
