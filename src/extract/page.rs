// * Documentation Page Extraction
// * Fetches a documentation page over plain HTTP and lifts its title,
// * heading outline, and body paragraphs into a typed structure. This runs
// * alongside the browser capture, not instead of it.

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::constants::HTTP_USER_AGENT;

static SELECTOR_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").unwrap());
static SELECTOR_HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());
static SELECTOR_PARAGRAPHS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").unwrap());

// * Bracketed reference markers ("[12]") that litter documentation prose
static CITATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status code: {0}")]
    Status(u16),

    #[error("Document contained no extractable content")]
    EmptyDocument,
}

/// A single heading with its outline level (1-6)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// Structured view of a documentation page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageStructure {
    pub title: Option<String>,
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
}

// * PageExtractor wraps the HTTP client used for structured fetches
pub struct PageExtractor {
    client: reqwest::Client,
}

impl PageExtractor {
    // * Initializes the client with a Chrome 120 identity
    pub fn new() -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(HTTP_USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client })
    }

    /// Downloads the page and parses it into a `PageStructure`
    pub async fn fetch_page_structure(&self, url: &str) -> Result<PageStructure, ExtractError> {
        debug!(url = %url, "Fetching documentation page");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(ExtractError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let structure = parse_page_structure(&body)?;

        info!(
            url = %url,
            headings = structure.headings.len(),
            paragraphs = structure.paragraphs.len(),
            "Extracted page structure"
        );

        Ok(structure)
    }
}

/// Parses raw HTML into a `PageStructure`
///
/// Citation markers are stripped and whitespace collapsed; blank headings and
/// paragraphs are dropped. A document yielding no title, headings, or
/// paragraphs is an error rather than an empty structure.
pub fn parse_page_structure(html: &str) -> Result<PageStructure, ExtractError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&SELECTOR_TITLE)
        .next()
        .map(|el| clean_text(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let mut headings = Vec::new();
    for el in document.select(&SELECTOR_HEADINGS) {
        let text = clean_text(&el.text().collect::<String>());
        if text.is_empty() {
            continue;
        }
        // * Element names are h1..h6, the level is the trailing digit
        let level = el
            .value()
            .name()
            .trim_start_matches('h')
            .parse::<u8>()
            .unwrap_or(6);
        headings.push(Heading { level, text });
    }

    let paragraphs: Vec<String> = document
        .select(&SELECTOR_PARAGRAPHS)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .filter(|p| !p.is_empty())
        .collect();

    if title.is_none() && headings.is_empty() && paragraphs.is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    Ok(PageStructure {
        title,
        headings,
        paragraphs,
    })
}

// * Strips citation markers and collapses runs of whitespace
fn clean_text(raw: &str) -> String {
    let without_citations = CITATION_MARKER.replace_all(raw, "");
    without_citations
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const SAMPLE_PAGE: &str = r#"
        <html>
          <head><title>Rust (programming language) - Wikipedia</title></head>
          <body>
            <h1>Rust (programming language)</h1>
            <h2>History</h2>
            <p>Rust began as a personal project.[1][2]</p>
            <p>
                It was adopted   by Mozilla
                for sponsorship.[3]
            </p>
            <h3></h3>
            <p>   </p>
          </body>
        </html>
    "#;

    #[test]
    fn test_parses_title_headings_paragraphs() {
        let structure = parse_page_structure(SAMPLE_PAGE).unwrap();

        assert_eq!(
            structure.title.as_deref(),
            Some("Rust (programming language) - Wikipedia")
        );
        assert_eq!(
            structure.headings,
            vec![
                Heading {
                    level: 1,
                    text: "Rust (programming language)".to_string()
                },
                Heading {
                    level: 2,
                    text: "History".to_string()
                },
            ]
        );
        assert_eq!(structure.paragraphs.len(), 2);
    }

    #[test]
    fn test_strips_citation_markers_and_collapses_whitespace() {
        let structure = parse_page_structure(SAMPLE_PAGE).unwrap();

        assert_eq!(structure.paragraphs[0], "Rust began as a personal project.");
        assert_eq!(
            structure.paragraphs[1],
            "It was adopted by Mozilla for sponsorship."
        );
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let result = parse_page_structure("<html><body><div>x</div></body></html>");
        assert!(matches!(result, Err(ExtractError::EmptyDocument)));
    }

    #[test]
    fn test_blank_markup_is_an_error() {
        let result = parse_page_structure("");
        assert!(matches!(result, Err(ExtractError::EmptyDocument)));
    }

    #[tokio::test]
    async fn test_fetch_parses_served_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/wiki/Rust");
                then.status(200)
                    .header("content-type", "text/html")
                    .body(SAMPLE_PAGE);
            })
            .await;

        let extractor = PageExtractor::new().unwrap();
        let structure = extractor
            .fetch_page_structure(&server.url("/wiki/Rust"))
            .await
            .unwrap();

        assert_eq!(structure.headings.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_surfaces_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/wiki/Missing");
                then.status(404).body("not found");
            })
            .await;

        let extractor = PageExtractor::new().unwrap();
        let result = extractor
            .fetch_page_structure(&server.url("/wiki/Missing"))
            .await;

        assert!(matches!(result, Err(ExtractError::Status(404))));
    }
}
