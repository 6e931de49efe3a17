// * Question Answering
// * Retrieval-then-generation over the search index: embed the question,
// * pull the closest chunks, and ask the text model to answer strictly from
// * that context.

use thiserror::Error;
use tracing::debug;

use crate::config::constants::{QA_PROMPT_TEMPLATE, QA_TOP_K};
use crate::index::embedder::Embedder;
use crate::index::store::{IndexError, SearchIndex};
use crate::vision::{GeminiClient, VisionError};

#[derive(Debug, Error)]
pub enum QaError {
    #[error("Retrieval failed: {0}")]
    Index(#[from] IndexError),

    #[error("Generation failed: {0}")]
    Generation(#[from] VisionError),
}

/// Answers a question from the index using the default context size
pub async fn answer(
    question: &str,
    index: &SearchIndex,
    embedder: &dyn Embedder,
    client: &GeminiClient,
) -> Result<String, QaError> {
    answer_with_top_k(question, index, embedder, client, QA_TOP_K).await
}

/// Answers a question with the top `k` retrieved chunks as context
pub async fn answer_with_top_k(
    question: &str,
    index: &SearchIndex,
    embedder: &dyn Embedder,
    client: &GeminiClient,
    top_k: usize,
) -> Result<String, QaError> {
    let hits = index.search(question, top_k, embedder).await?;
    debug!(hits = hits.len(), "Retrieved context for question");

    let context = hits
        .iter()
        .map(|hit| hit.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let prompt = QA_PROMPT_TEMPLATE
        .replace("{context}", &context)
        .replace("{question}", question);

    Ok(client.generate_text(&prompt).await?)
}
