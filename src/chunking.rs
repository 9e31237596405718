//! Word-window chunking of raw text.
//!
//! Documents are split into overlapping windows of whitespace-delimited
//! words. The window advances by `chunk_size - overlap` words per step, so
//! `overlap` must stay strictly below `chunk_size` or the walk would never
//! terminate; [`ChunkingConfig::validate`] rejects that at startup.

use serde::{Deserialize, Serialize};

use crate::types::{Chunk, RagError};

/// Chunk window parameters, in words.
///
/// One canonical configuration is applied to every ingest path; the
/// defaults can be overridden through `RAG_CHUNK_SIZE` / `RAG_CHUNK_OVERLAP`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum words per chunk.
    pub chunk_size: usize,
    /// Words shared between consecutive chunks.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            overlap: 100,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Ensures the stride `chunk_size - overlap` is at least one word.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than 0".into()));
        }
        if self.overlap >= self.chunk_size {
            return Err(RagError::Config(format!(
                "overlap ({}) must be strictly less than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Splits `text` into overlapping word-window chunks.
///
/// Words are whitespace-delimited with order preserved. Empty or
/// whitespace-only input yields zero chunks. The caller is expected to have
/// validated `config` already; an invalid config here is a programming
/// error and is rejected the same way.
pub fn split_text(text: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, RagError> {
    config.validate()?;

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut position = 0usize;
    while start < words.len() {
        let end = (start + config.chunk_size).min(words.len());
        chunks.push(Chunk {
            text: words[start..end].join(" "),
            position,
        });
        position += 1;
        start += config.stride();
    }

    Ok(chunks)
}
