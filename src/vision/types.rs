// * Gemini Wire Types
// * Request and response shapes for the generateContent and
// * batchEmbedContents endpoints. Field names follow the REST API; aliases
// * accept both snake_case and camelCase on the way in.

use serde::{Deserialize, Serialize};

// ============================================================
// * Content generation
// ============================================================

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        rename = "inline_data",
        alias = "inlineData",
        skip_serializing_if = "Option::is_none"
    )]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64-encoded media attached to a prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    #[serde(rename = "mime_type", alias = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

// ============================================================
// * Embeddings
// ============================================================

#[derive(Debug, Clone, Serialize)]
pub struct BatchEmbedRequest {
    pub requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedContentRequest {
    /// Fully qualified model name, e.g. `models/embedding-001`
    pub model: String,
    pub content: Content,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchEmbedResponse {
    #[serde(default)]
    pub embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingValues {
    #[serde(default)]
    pub values: Vec<f32>,
}

// ============================================================
// * Errors
// ============================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case_config() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text("describe this")],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.3),
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["temperature"], 0.3);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "describe this");
    }

    #[test]
    fn test_inline_data_omitted_for_text_parts() {
        let json = serde_json::to_value(Part::text("hello")).unwrap();
        assert!(json.get("inline_data").is_none());
    }

    #[test]
    fn test_response_accepts_camel_case_inline_data() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "a page"},
                        {"inlineData": {"mimeType": "image/png", "data": "AA=="}}
                    ]
                }
            }]
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let parts = &response.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("a page"));
        assert_eq!(
            parts[1].inline_data.as_ref().unwrap().mime_type,
            "image/png"
        );
    }

    #[test]
    fn test_empty_response_deserializes() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn test_batch_embed_round_trip_shapes() {
        let request = BatchEmbedRequest {
            requests: vec![EmbedContentRequest {
                model: "models/embedding-001".to_string(),
                content: Content {
                    parts: vec![Part::text("chunk")],
                },
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["requests"][0]["model"], "models/embedding-001");

        let raw = r#"{"embeddings": [{"values": [0.1, 0.2]}]}"#;
        let response: BatchEmbedResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.embeddings[0].values.len(), 2);
    }
}
