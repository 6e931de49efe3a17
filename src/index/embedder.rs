// * Embedding Providers
// * The index is embedder-agnostic: anything that can turn text into fixed
// * width vectors works. The hosted provider batches against the
// * batchEmbedContents endpoint; the hash provider is deterministic and
// * offline for tests and air-gapped runs.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

use crate::config::constants::{EMBED_BATCH_LIMIT, GEMINI_BASE_URL, GEMINI_EMBED_MODEL};
use crate::vision::types::{
    ApiErrorResponse, BatchEmbedRequest, BatchEmbedResponse, Content, EmbedContentRequest, Part,
};

// * Width of every embedding vector in the index
pub const EMBEDDING_DIM: usize = 768;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("Cannot embed empty text")]
    EmptyText,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Expected {expected} embeddings, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

pub type AsyncResult<T> = Pin<Box<dyn Future<Output = Result<T, EmbedError>> + Send>>;

/// Trait for turning text into embedding vectors
pub trait Embedder: Send + Sync {
    /// Embeds a batch of documents
    fn embed_texts(&self, texts: Vec<String>) -> AsyncResult<Vec<Vec<f32>>>;

    /// Embeds a single query string
    fn embed_query(&self, text: String) -> AsyncResult<Vec<f32>>;
}

// * Hosted embedder backed by the batchEmbedContents endpoint
#[derive(Debug, Clone)]
pub struct GeminiEmbedder {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiEmbedder {
    pub fn new(api_key: impl Into<String>) -> Result<Self, EmbedError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    // * Points the client at a different endpoint (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let endpoint = format!(
            "{}/models/{}:batchEmbedContents?key={}",
            self.base_url, GEMINI_EMBED_MODEL, self.api_key
        );
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: format!("models/{GEMINI_EMBED_MODEL}"),
                    content: Content {
                        parts: vec![Part::text(text.clone())],
                    },
                })
                .collect(),
        };

        debug!(batch = texts.len(), "Requesting embeddings");
        let resp = self.http_client.post(&endpoint).json(&request).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(parsed) => parsed.error.message,
                Err(_) => body.chars().take(200).collect(),
            };
            return Err(EmbedError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response: BatchEmbedResponse = resp.json().await?;
        if response.embeddings.len() != texts.len() {
            return Err(EmbedError::ShapeMismatch {
                expected: texts.len(),
                actual: response.embeddings.len(),
            });
        }

        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }

    // * The endpoint caps batch size, so large inputs go up in slices
    async fn embed_all(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH_LIMIT) {
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}

impl Embedder for GeminiEmbedder {
    fn embed_texts(&self, texts: Vec<String>) -> AsyncResult<Vec<Vec<f32>>> {
        let client = self.clone();
        Box::pin(async move { client.embed_all(texts).await })
    }

    fn embed_query(&self, text: String) -> AsyncResult<Vec<f32>> {
        let client = self.clone();
        Box::pin(async move {
            let mut vectors = client.embed_all(vec![text]).await?;
            vectors.pop().ok_or(EmbedError::ShapeMismatch {
                expected: 1,
                actual: 0,
            })
        })
    }
}

/// Deterministic offline embedder
///
/// Generates a normalized pseudo-embedding from the text's hash. Not
/// semantically meaningful, but stable across runs, which is what the
/// round-trip and cache tests need.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashEmbedder;

impl HashEmbedder {
    pub fn new() -> Self {
        Self
    }

    fn embed_one(text: &str) -> Result<Vec<f32>, EmbedError> {
        if text.trim().is_empty() {
            return Err(EmbedError::EmptyText);
        }

        let hash = xxh64(text.as_bytes(), 0);
        let embedding: Vec<f32> = (0..EMBEDDING_DIM)
            .map(|i| {
                let seed = hash.wrapping_add(i as u64);
                // * Generate value in [-1, 1] range
                ((seed % 2000) as f32 / 1000.0) - 1.0
            })
            .collect();

        // * Normalize the embedding vector
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            Ok(embedding.iter().map(|x| x / magnitude).collect())
        } else {
            Ok(embedding)
        }
    }
}

impl Embedder for HashEmbedder {
    fn embed_texts(&self, texts: Vec<String>) -> AsyncResult<Vec<Vec<f32>>> {
        Box::pin(async move { texts.iter().map(|text| Self::embed_one(text)).collect() })
    }

    fn embed_query(&self, text: String) -> AsyncResult<Vec<f32>> {
        Box::pin(async move { Self::embed_one(&text) })
    }
}
