//! Router-level tests over the HTML/form surface, served on an
//! ephemeral port with in-process fakes behind it.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;

use ragweave::chunking::ChunkingConfig;
use ragweave::embeddings::MockEmbeddingProvider;
use ragweave::generation::{AnswerConfig, Answerer, CompletionBackend};
use ragweave::ingestion::Ingestor;
use ragweave::pipeline::RagPipeline;
use ragweave::rerank::RerankStage;
use ragweave::retrieval::Retriever;
use ragweave::server::{AppState, router};
use ragweave::stores::InMemoryVectorStore;
use ragweave::types::RagError;

struct CannedCompletion;

#[async_trait]
impl CompletionBackend for CannedCompletion {
    async fn complete(&self, _prompt: &str, _max_tokens: usize) -> Result<String, RagError> {
        Ok("The sky is blue.".to_string())
    }
}

async fn serve() -> SocketAddr {
    let embedder = Arc::new(MockEmbeddingProvider::with_dimension(64));
    let store = Arc::new(InMemoryVectorStore::new(64));
    let state = AppState {
        ingestor: Arc::new(
            Ingestor::new(embedder.clone(), store.clone(), ChunkingConfig::new(100, 10)).unwrap(),
        ),
        pipeline: Arc::new(RagPipeline::new(
            Retriever::new(embedder, store),
            RerankStage::passthrough(5),
            Answerer::new(Arc::new(CannedCompletion), AnswerConfig::default()),
            10,
        )),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn home_serves_the_upload_form() {
    let addr = serve().await;
    let body = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("<form action=\"/ask\""));
    assert!(body.contains("upload-text"));
}

#[tokio::test]
async fn upload_reports_success() {
    let addr = serve().await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .form(&[("text", "The sky is blue. Water is wet.")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "status": "success" }));
}

#[tokio::test]
async fn ask_renders_answer_with_numbered_sources() {
    let addr = serve().await;
    let client = reqwest::Client::new();
    client
        .post(format!("http://{addr}/upload"))
        .form(&[("text", "The sky is blue. Water is wet.")])
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let body = client
        .post(format!("http://{addr}/ask"))
        .form(&[("question", "What color is the sky?")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("<h2>Answer</h2>"));
    assert!(body.contains("The sky is blue."));
    // Uploaded text is ingested under the "user" source label.
    assert!(body.contains("[1] user | position 0"));
    assert!(body.contains("Time taken:"));
}

#[tokio::test]
async fn ask_without_context_renders_no_context_page() {
    let addr = serve().await;
    let body = reqwest::Client::new()
        .post(format!("http://{addr}/ask"))
        .form(&[("question", "Anything in here?")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("No relevant context found"));
}
