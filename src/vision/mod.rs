// * Vision & Generation
// * REST client and wire types for the Gemini generative endpoints.

pub mod client;
pub mod types;

// * Re-exports for convenient access
pub use client::{mime_for_path, GeminiClient, VisionError};
pub use types::{
    ApiError, ApiErrorResponse, BatchEmbedRequest, BatchEmbedResponse, Candidate, Content,
    EmbedContentRequest, EmbeddingValues, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InlineData, Part,
};
