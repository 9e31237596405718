//! Environment-driven configuration, validated once at startup.
//!
//! Missing credentials or invalid chunk parameters produce
//! [`RagError::Config`] before the process starts serving requests.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::chunking::ChunkingConfig;
use crate::types::RagError;

/// Embedding backend settings.
#[derive(Clone, Debug)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
}

/// Hosted vector index settings.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub api_key: String,
    pub index_host: String,
}

/// Rerank service settings; absent entirely when no credential is set, in
/// which case the pipeline runs with pass-through ranking.
#[derive(Clone, Debug)]
pub struct RerankConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Generation backend settings.
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
}

/// Full service configuration.
#[derive(Clone, Debug)]
pub struct RagConfig {
    pub bind_addr: String,
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub top_n: usize,
    pub http_timeout: Duration,
    pub embedding: EmbeddingConfig,
    pub store: StoreConfig,
    pub rerank: Option<RerankConfig>,
    pub generation: GenerationConfig,
}

/// Variable lookup seam so tests can feed settings without mutating the
/// process environment.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

impl RagConfig {
    /// Loads configuration from the environment.
    ///
    /// Required: `PINECONE_API_KEY`, `PINECONE_INDEX_HOST`. `COHERE_API_KEY`
    /// is optional; without it reranking degrades to pass-through. All
    /// numeric knobs have defaults matching the reference configuration.
    pub fn from_env() -> Result<Self, RagError> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    fn from_lookup(lookup: Lookup) -> Result<Self, RagError> {
        let chunking = ChunkingConfig::new(
            parse_var(lookup, "RAG_CHUNK_SIZE", ChunkingConfig::default().chunk_size)?,
            parse_var(lookup, "RAG_CHUNK_OVERLAP", ChunkingConfig::default().overlap)?,
        );
        chunking.validate()?;

        let rerank = match optional_var(lookup, "COHERE_API_KEY") {
            Some(api_key) => Some(RerankConfig {
                api_key,
                base_url: var_or(lookup, "COHERE_BASE_URL", "https://api.cohere.com"),
                model: var_or(lookup, "COHERE_RERANK_MODEL", "rerank-english-v3.0"),
            }),
            None => None,
        };

        Ok(Self {
            bind_addr: var_or(lookup, "RAG_BIND_ADDR", "127.0.0.1:8000"),
            chunking,
            top_k: parse_var(lookup, "RAG_TOP_K", 10)?,
            top_n: parse_var(lookup, "RAG_TOP_N", 5)?,
            http_timeout: Duration::from_secs(parse_var(lookup, "RAG_HTTP_TIMEOUT_SECS", 30)?),
            embedding: EmbeddingConfig {
                base_url: var_or(lookup, "EMBEDDING_BASE_URL", "http://127.0.0.1:11434"),
                model: var_or(lookup, "EMBEDDING_MODEL", "all-minilm"),
                dimension: parse_var(lookup, "RAG_EMBEDDING_DIM", 384)?,
            },
            store: StoreConfig {
                api_key: required_var(lookup, "PINECONE_API_KEY")?,
                index_host: required_var(lookup, "PINECONE_INDEX_HOST")?,
            },
            rerank,
            generation: GenerationConfig {
                base_url: var_or(lookup, "GENERATION_BASE_URL", "http://127.0.0.1:11434"),
                model: var_or(lookup, "GENERATION_MODEL", "llama3.2"),
            },
        })
    }
}

fn required_var(lookup: Lookup, key: &str) -> Result<String, RagError> {
    optional_var(lookup, key)
        .ok_or_else(|| RagError::Config(format!("missing required env var {key}")))
}

fn optional_var(lookup: Lookup, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn var_or(lookup: Lookup, key: &str, default: &str) -> String {
    optional_var(lookup, key).unwrap_or_else(|| default.to_string())
}

fn parse_var<T: FromStr>(lookup: Lookup, key: &str, default: T) -> Result<T, RagError> {
    match optional_var(lookup, key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| RagError::Config(format!("env var {key} has invalid value '{raw}'"))),
        None => Ok(default),
    }
}
