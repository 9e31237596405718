use std::sync::Arc;

use reqwest::Client;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

use ragweave::config::RagConfig;
use ragweave::embeddings::{EmbeddingProvider, HttpEmbeddingProvider};
use ragweave::generation::{Answerer, AnswerConfig, HttpCompletionProvider};
use ragweave::ingestion::Ingestor;
use ragweave::pipeline::RagPipeline;
use ragweave::rerank::{CohereReranker, RerankStage};
use ragweave::retrieval::Retriever;
use ragweave::server::{AppState, router};
use ragweave::stores::{PineconeIndex, VectorStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Config errors are fatal: refuse to serve rather than run misconfigured.
    let config = RagConfig::from_env()?;

    let client = Client::builder()
        .user_agent(concat!("ragweave/", env!("CARGO_PKG_VERSION")))
        .use_rustls_tls()
        .timeout(config.http_timeout)
        .build()?;

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HttpEmbeddingProvider::new(
        client.clone(),
        &config.embedding.base_url,
        &config.embedding.model,
        config.embedding.dimension,
    ));
    let store: Arc<dyn VectorStore> = Arc::new(PineconeIndex::new(
        client.clone(),
        &config.store.index_host,
        &config.store.api_key,
        config.embedding.dimension,
    ));
    let rerank = match &config.rerank {
        Some(rerank) => RerankStage::new(
            Arc::new(CohereReranker::new(
                client.clone(),
                &rerank.base_url,
                &rerank.api_key,
                &rerank.model,
            )),
            config.top_n,
        ),
        None => {
            tracing::warn!("no rerank credential configured, using pass-through ranking");
            RerankStage::passthrough(config.top_n)
        }
    };
    let answerer = Answerer::new(
        Arc::new(HttpCompletionProvider::new(
            client,
            &config.generation.base_url,
            &config.generation.model,
        )),
        AnswerConfig::default(),
    );

    let state = AppState {
        ingestor: Arc::new(Ingestor::new(
            embedder.clone(),
            store.clone(),
            config.chunking,
        )?),
        pipeline: Arc::new(RagPipeline::new(
            Retriever::new(embedder, store),
            rerank,
            answerer,
            config.top_k,
        )),
    };

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("serving on http://{}", config.bind_addr);
    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}
