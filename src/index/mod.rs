// * Retrieval Index
// * Embedding providers, the persisted similarity index, and question
// * answering over retrieved chunks.

pub mod embedder;
pub mod qa;
pub mod store;

// * Re-exports for convenient access
pub use embedder::{
    AsyncResult, EmbedError, Embedder, GeminiEmbedder, HashEmbedder, EMBEDDING_DIM,
};
pub use qa::{answer, answer_with_top_k, QaError};
pub use store::{IndexError, IndexedChunk, ScoredChunk, SearchIndex};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_module_exports() {
        // * Verify the main workflow types compose
        let embedder = HashEmbedder::new();
        let index = SearchIndex::build(vec!["exported".to_string()], &embedder)
            .await
            .unwrap();
        assert_eq!(index.len(), 1);

        let query = embedder.embed_query("exported".to_string()).await.unwrap();
        assert_eq!(query.len(), EMBEDDING_DIM);

        let hits = index.rank(&query, 1);
        assert_eq!(hits.len(), 1);
    }
}
