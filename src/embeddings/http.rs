//! HTTP embedding client (Ollama-compatible `/api/embed` endpoint).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::types::RagError;

/// Embedding provider backed by an HTTP model server.
///
/// Expects the Ollama-style batch contract:
/// `POST {base}/api/embed { "model", "input": [texts] }` returning
/// `{ "embeddings": [[f32; dim]] }`. Every returned vector is checked
/// against the configured dimension.
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

impl HttpEmbeddingProvider {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimension,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&EmbedRequest {
                model: &self.model,
                input: inputs,
            })
            .send()
            .await
            .map_err(|err| RagError::transport(err, RagError::Embedding))?
            .error_for_status()
            .map_err(|err| RagError::Embedding(err.to_string()))?;

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|err| RagError::Embedding(err.to_string()))?;

        if body.embeddings.len() != inputs.len() {
            return Err(RagError::Embedding(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                body.embeddings.len()
            )));
        }
        for vector in &body.embeddings {
            if vector.len() != self.dimension {
                return Err(RagError::Embedding(format!(
                    "embedding dimension {} does not match configured dimension {}",
                    vector.len(),
                    self.dimension
                )));
            }
        }

        Ok(body.embeddings)
    }
}
