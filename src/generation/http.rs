//! HTTP generation client (Ollama-compatible `/api/generate` endpoint).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::CompletionBackend;
use crate::types::RagError;

/// Completion backend speaking the Ollama generate contract:
/// `POST {base}/api/generate` with `stream: false` and a `num_predict`
/// output bound, returning `{ "response": "..." }`.
#[derive(Clone)]
pub struct HttpCompletionProvider {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: usize,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl HttpCompletionProvider {
    pub fn new(client: Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionProvider {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, RagError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
                options: GenerateOptions {
                    num_predict: max_tokens,
                },
            })
            .send()
            .await
            .map_err(|err| RagError::transport(err, RagError::Generation))?
            .error_for_status()
            .map_err(|err| RagError::Generation(err.to_string()))?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|err| RagError::Generation(err.to_string()))?;
        Ok(body.response)
    }
}
