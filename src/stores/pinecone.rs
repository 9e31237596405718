//! Pinecone-style HTTP index client.
//!
//! Wire contract: `POST {host}/vectors/upsert` with a `vectors` batch and
//! `POST {host}/query` with `vector`/`topK`/`includeMetadata`, both
//! authenticated via the `Api-Key` header.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{VectorMatch, VectorRecord, VectorStore};
use crate::types::RagError;

#[derive(Clone)]
pub struct PineconeIndex {
    client: Client,
    host: String,
    api_key: String,
    dimension: usize,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

impl PineconeIndex {
    pub fn new(
        client: Client,
        host: impl Into<String>,
        api_key: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            dimension,
        }
    }
}

#[async_trait]
impl VectorStore for PineconeIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, vectors: Vec<VectorRecord>) -> Result<(), RagError> {
        if vectors.is_empty() {
            return Ok(());
        }

        self.client
            .post(format!("{}/vectors/upsert", self.host))
            .header("Api-Key", &self.api_key)
            .json(&UpsertRequest { vectors: &vectors })
            .send()
            .await
            .map_err(|err| RagError::transport(err, RagError::Store))?
            .error_for_status()
            .map_err(|err| RagError::Store(err.to_string()))?;

        tracing::debug!(count = vectors.len(), "upserted vectors");
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, RagError> {
        let response = self
            .client
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata: true,
            })
            .send()
            .await
            .map_err(|err| RagError::transport(err, RagError::Store))?
            .error_for_status()
            .map_err(|err| RagError::Store(err.to_string()))?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|err| RagError::Store(err.to_string()))?;
        Ok(body.matches)
    }
}
