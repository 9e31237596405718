//! ```text
//! Raw text ──► chunking::split_text ──► embeddings::EmbeddingProvider
//!                                                  │
//!                                                  ▼
//!                      ingestion::Ingestor ──► stores::VectorStore (upsert)
//!
//! Question ──► retrieval::Retriever ──► rerank::RerankStage ──┐
//!                                                             ▼
//!                         pipeline::RagPipeline ──► generation::Answerer
//!                                                             │
//! HTTP form (server) ◄── answer + sources + elapsed ◄─────────┘
//! ```
//!
//! All external capabilities (embedder, vector index, reranker, generator)
//! sit behind traits and are injected at construction time; `main.rs` owns
//! the wiring and lifecycle.

pub mod chunking;
pub mod config;
pub mod embeddings;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod rerank;
pub mod retrieval;
pub mod server;
pub mod stores;
pub mod types;

pub use chunking::{ChunkingConfig, split_text};
pub use ingestion::{IngestReport, Ingestor};
pub use pipeline::{AskOutcome, RagPipeline, SourceRef};
pub use retrieval::Retriever;
pub use types::RagError;
