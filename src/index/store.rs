// * Similarity-Searchable Index
// * Flat in-memory vector store over embedded chunks with cosine ranking,
// * persisted as a single JSON document inside the index directory. The
// * directory's presence is the index-phase cache gate; loading cached data
// * must be opted into explicitly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use xxhash_rust::xxh64::xxh64;

use crate::index::embedder::{EmbedError, Embedder};

// * On-disk file name inside the index directory
const INDEX_FILE: &str = "index.json";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("No non-empty chunks to index")]
    EmptyIndex,

    #[error("Embedding failed: {0}")]
    Embed(#[from] EmbedError),

    #[error("Embedding width mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Refusing to load serialized index data without explicit opt-in")]
    UntrustedDataRefused,

    #[error("Index not found at {0}")]
    NotFound(PathBuf),
}

/// One embedded chunk in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// Content hash of the chunk text
    pub id: u64,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A ranked search hit
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub id: u64,
    pub text: String,
    pub score: f32,
}

/// Flat cosine-similarity index over embedded text chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    entries: Vec<IndexedChunk>,
    dim: usize,
}

impl SearchIndex {
    /// Embeds the given chunks and builds an index over them
    ///
    /// Whitespace-only chunks are dropped before embedding. All vectors must
    /// come back the same width.
    pub async fn build(
        chunks: Vec<String>,
        embedder: &dyn Embedder,
    ) -> Result<Self, IndexError> {
        let chunks: Vec<String> = chunks
            .into_iter()
            .filter(|chunk| !chunk.trim().is_empty())
            .collect();

        if chunks.is_empty() {
            return Err(IndexError::EmptyIndex);
        }

        let embeddings = embedder.embed_texts(chunks.clone()).await?;
        let dim = embeddings.first().map(|e| e.len()).unwrap_or(0);
        for embedding in &embeddings {
            if embedding.len() != dim {
                return Err(IndexError::DimensionMismatch {
                    expected: dim,
                    actual: embedding.len(),
                });
            }
        }

        let entries: Vec<IndexedChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| IndexedChunk {
                id: xxh64(text.as_bytes(), 0),
                text,
                embedding,
            })
            .collect();

        info!(entries = entries.len(), dim = dim, "Search index built");
        Ok(Self { entries, dim })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    // * Existence of the directory is the cache signal
    pub fn exists(dir: &Path) -> bool {
        dir.is_dir()
    }

    /// Writes the index into `dir`, atomically via a sibling temp file
    pub fn persist(&self, dir: &Path) -> Result<(), IndexError> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join(INDEX_FILE);
        let tmp_path = dir.join(format!("{INDEX_FILE}.tmp"));
        let json = serde_json::to_string(self)?;
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &path)?;

        debug!(path = %path.display(), entries = self.entries.len(), "Index persisted");
        Ok(())
    }

    /// Loads a persisted index from `dir`
    ///
    /// Deserializing index data is only safe when the directory is one this
    /// process wrote, so callers must pass `allow_untrusted_data` to opt in.
    pub fn load(dir: &Path, allow_untrusted_data: bool) -> Result<Self, IndexError> {
        if !allow_untrusted_data {
            return Err(IndexError::UntrustedDataRefused);
        }

        let path = dir.join(INDEX_FILE);
        if !path.is_file() {
            return Err(IndexError::NotFound(path));
        }

        let json = std::fs::read_to_string(&path)?;
        let index: Self = serde_json::from_str(&json)?;
        debug!(path = %path.display(), entries = index.entries.len(), "Index loaded");
        Ok(index)
    }

    /// Embeds the query and returns the top `k` chunks by cosine similarity
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        embedder: &dyn Embedder,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        let query_embedding = embedder.embed_query(query.to_string()).await?;
        Ok(self.rank(&query_embedding, k))
    }

    /// Ranks entries against an already-embedded query
    ///
    /// Ties keep insertion order. `k` larger than the index returns
    /// everything.
    pub fn rank(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                id: entry.id,
                text: entry.text.clone(),
                score: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

// * Zero-magnitude vectors score 0.0 rather than NaN
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}
