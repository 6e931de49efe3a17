// * The Refinery (Text Processing)
// * Goal: turn the flattened SiteMap text into index-ready chunks.

pub mod chunker;

// * Re-exports for convenient access
pub use chunker::{chunk_text, chunk_text_with_window, ChunkerConfig, SlidingWindowChunker, TextChunk};
