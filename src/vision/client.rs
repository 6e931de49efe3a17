// * Gemini Client
// * Thin REST client for the generative endpoints: image description for
// * screenshots and downloaded page images, and plain text generation for
// * answering questions over retrieved context.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::constants::{
    GEMINI_BASE_URL, GEMINI_TEXT_MODEL, GEMINI_VISION_MODEL, HTTP_USER_AGENT, QA_TEMPERATURE,
};
use crate::vision::types::{
    ApiErrorResponse, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no usable content")]
    EmptyResponse,

    #[error("Image download failed for {url}: status {status}")]
    Download { url: String, status: u16 },
}

// * GeminiClient talks to the generative REST API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(Duration::from_secs(120))
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

    /// Describes an in-memory image with the given prompt
    pub async fn describe_image(
        &self,
        bytes: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, VisionError> {
        let parts = vec![
            Part::text(prompt),
            Part::inline_data(mime_type, BASE64.encode(bytes)),
        ];
        self.generate(GEMINI_VISION_MODEL, parts, None).await
    }

    /// Downloads a remote image and describes it with the given prompt
    pub async fn describe_image_url(
        &self,
        image_url: &str,
        prompt: &str,
    ) -> Result<String, VisionError> {
        let resp = self.http_client.get(image_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(VisionError::Download {
                url: image_url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        self.describe_image(&bytes, mime_for_path(image_url), prompt)
            .await
    }

    /// Generates a text answer from a plain prompt
    pub async fn generate_text(&self, prompt: &str) -> Result<String, VisionError> {
        let config = GenerationConfig {
            temperature: Some(QA_TEMPERATURE),
        };
        self.generate(GEMINI_TEXT_MODEL, vec![Part::text(prompt)], Some(config))
            .await
    }

    async fn generate(
        &self,
        model: &str,
        parts: Vec<Part>,
        generation_config: Option<GenerationConfig>,
    ) -> Result<String, VisionError> {
        let endpoint = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config,
        };

        debug!(model = %model, "Calling generative endpoint");
        let resp = self.http_client.post(&endpoint).json(&request).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(parsed) => parsed.error.message,
                Err(_) => body.chars().take(200).collect(),
            };
            return Err(VisionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response: GenerateContentResponse = resp.json().await?;
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(VisionError::EmptyResponse);
        }

        Ok(text)
    }
}

/// Guesses a MIME type from the path's file extension, defaulting to PNG
pub fn mime_for_path(path: &str) -> &'static str {
    // * URLs carry queries and fragments, so parse when possible
    let clean_path = match Url::parse(path) {
        Ok(url) => url.path().to_lowercase(),
        Err(_) => path.to_lowercase(),
    };

    match clean_path.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tiff") => "image/tiff",
        Some("webp") => "image/webp",
        // * PNG doubles as the fallback for extensionless asset URLs
        _ => "image/png",
    }
}
