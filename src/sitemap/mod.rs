// * Site Map
// * The merged scrape artifact: structured page content, screenshot and
// * image descriptions, and provenance. Serialized as a single JSON document
// * whose presence on disk is the scrape-phase cache gate.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

use crate::extract::PageStructure;

#[derive(Debug, Error)]
pub enum SiteMapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A described page image, keyed by its source URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescription {
    pub url: String,
    pub description: String,
}

/// Everything the scrape phase learned about one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMap {
    /// URL the scrape ran against
    pub target_url: String,
    /// Stamp used to detect a cached map built for a different URL
    pub url_hash: u64,
    /// Structured content, present only for documentation pages
    pub page: Option<PageStructure>,
    /// Vision descriptions of the scrolling screenshots, in capture order
    pub screenshot_descriptions: Vec<String>,
    /// Vision descriptions of images referenced by the page
    pub image_descriptions: Vec<ImageDescription>,
    /// Total image URLs discovered, described or not
    pub image_count: usize,
    /// Unix seconds at creation
    pub created_at: u64,
}

impl SiteMap {
    pub fn new(target_url: impl Into<String>) -> Self {
        let target_url = target_url.into();
        let url_hash = xxh64(target_url.as_bytes(), 0);
        Self {
            target_url,
            url_hash,
            page: None,
            screenshot_descriptions: Vec::new(),
            image_descriptions: Vec::new(),
            image_count: 0,
            created_at: current_timestamp(),
        }
    }

    // * Existence of the file is the cache signal; contents are not inspected
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Writes the map as pretty JSON, atomically via a sibling temp file
    pub fn save(&self, path: &Path) -> Result<(), SiteMapError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;

        debug!(path = %path.display(), "Site map saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SiteMapError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Renders the map as plain text for chunking
    ///
    /// One logical item per line, so the newline-splitting chunker keeps
    /// titles, paragraphs, and descriptions whole. Ends with a sentence
    /// stating the image count so that count survives retrieval.
    pub fn flatten(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push(format!("Website: {}", self.target_url));

        if let Some(page) = &self.page {
            if let Some(title) = &page.title {
                lines.push(format!("Title: {title}"));
            }
            for heading in &page.headings {
                lines.push(format!("Section: {}", heading.text));
            }
            for paragraph in &page.paragraphs {
                lines.push(paragraph.clone());
            }
        }

        for (i, description) in self.screenshot_descriptions.iter().enumerate() {
            lines.push(format!("Screenshot {}: {}", i + 1, description));
        }

        for image in &self.image_descriptions {
            lines.push(format!("{}: {}", image.url, image.description));
        }

        lines.push(format!(
            "Number of images present in the website is {}",
            self.image_count
        ));

        lines.join("\n")
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
