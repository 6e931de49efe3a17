// * Pipeline Orchestrator
// * Runs the whole ingestion sequence for one target URL: scrape phase
// * (structured extraction, browser capture, vision descriptions, site map
// * merge) then index phase (flatten, chunk, embed, persist). Each phase is
// * gated by the existence of its on-disk artifact, so reruns against a
// * warm directory touch no network at all.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::capture::{
    combine_captures, wait_for_captures, CaptureOutcome, PageCapturer, WaitConfig,
};
use crate::config::constants::DESCRIBE_PROMPT;
use crate::config::{ArtifactLayout, Settings};
use crate::extract::{is_documentation_url, PageExtractor};
use crate::index::{self, Embedder, GeminiEmbedder, IndexError, QaError, SearchIndex};
use crate::ops::{PipelineStats, PipelineStatsSnapshot};
use crate::refinery::chunk_text;
use crate::sitemap::{ImageDescription, SiteMap, SiteMapError};
use crate::vision::{mime_for_path, GeminiClient};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No screenshots were captured")]
    NoScreenshots,

    #[error("No usable site map for {0}")]
    SiteMapUnavailable(String),

    #[error("Site map persistence failed: {0}")]
    SiteMap(#[from] SiteMapError),

    #[error("Index phase failed: {0}")]
    Index(#[from] IndexError),

    #[error("Pipeline setup failed: {0}")]
    Setup(String),
}

// * Orchestrator owns every stage client for one target URL
pub struct Orchestrator {
    target_url: String,
    layout: ArtifactLayout,
    wait: WaitConfig,
    extractor: PageExtractor,
    vision: GeminiClient,
    embedder: Arc<dyn Embedder>,
    stats: PipelineStats,
}

impl Orchestrator {
    /// Builds an orchestrator from runtime settings, with the hosted
    /// vision and embedding backends
    pub fn new(settings: &Settings) -> Result<Self, PipelineError> {
        let extractor = PageExtractor::new().map_err(|e| PipelineError::Setup(e.to_string()))?;
        let vision =
            GeminiClient::new(&settings.api_key).map_err(|e| PipelineError::Setup(e.to_string()))?;
        let embedder = GeminiEmbedder::new(&settings.api_key)
            .map_err(|e| PipelineError::Setup(e.to_string()))?;

        Ok(Self::with_parts(
            settings.target_url.clone(),
            settings.layout(),
            WaitConfig::default(),
            extractor,
            vision,
            Arc::new(embedder),
        ))
    }

    /// Builds an orchestrator from explicit parts
    pub fn with_parts(
        target_url: impl Into<String>,
        layout: ArtifactLayout,
        wait: WaitConfig,
        extractor: PageExtractor,
        vision: GeminiClient,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            target_url: target_url.into(),
            layout,
            wait,
            extractor,
            vision,
            embedder,
            stats: PipelineStats::new(),
        }
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn stats(&self) -> PipelineStatsSnapshot {
        self.stats.snapshot()
    }

    /// Runs the full pipeline, returning the ready index or `None`
    ///
    /// Failures are logged rather than propagated; callers only need to know
    /// whether an index came out the other end.
    pub async fn run(&self) -> Option<SearchIndex> {
        match self.run_inner().await {
            Ok(search_index) => Some(search_index),
            Err(e) => {
                error!(url = %self.target_url, error = %e, "Pipeline run failed");
                None
            }
        }
    }

    async fn run_inner(&self) -> Result<SearchIndex, PipelineError> {
        // * Scrape phase, gated on the site map file
        let mut fresh_map: Option<SiteMap> = None;
        if SiteMap::exists(&self.layout.sitemap_file) {
            info!(
                path = %self.layout.sitemap_file.display(),
                "Site map already on disk, skipping scrape phase"
            );
            self.stats.record_cache_hit();
        } else {
            let map = self.build_site_map().await?;
            map.save(&self.layout.sitemap_file)?;
            fresh_map = Some(map);
        }

        // * Index phase, gated on the index directory
        if SearchIndex::exists(&self.layout.index_dir) {
            info!(
                path = %self.layout.index_dir.display(),
                "Index already on disk, loading"
            );
            self.stats.record_cache_hit();
            return Ok(SearchIndex::load(&self.layout.index_dir, true)?);
        }

        let map = match fresh_map {
            Some(map) => map,
            None => self.load_cached_site_map(&self.layout.sitemap_file)?,
        };

        let text = map.flatten();
        let chunks = chunk_text(&text);
        self.stats.record_chunks(chunks.len() as u64);
        info!(chunks = chunks.len(), "Site map flattened and chunked");

        if let Err(e) = self.dump_chunks(&chunks) {
            warn!(error = %e, "Chunk dump failed, continuing");
        }

        let search_index = SearchIndex::build(chunks, self.embedder.as_ref()).await?;
        search_index.persist(&self.layout.index_dir)?;

        // * Serve the persisted bytes, exactly what a warm rerun would load
        Ok(SearchIndex::load(&self.layout.index_dir, true)?)
    }

    // * Scrape phase: extraction and capture degrade, description failures
    // * skip, an empty screenshot folder is fatal
    async fn build_site_map(&self) -> Result<SiteMap, PipelineError> {
        let mut map = SiteMap::new(&self.target_url);

        if is_documentation_url(&self.target_url) {
            match self.extractor.fetch_page_structure(&self.target_url).await {
                Ok(page) => map.page = Some(page),
                Err(e) => {
                    warn!(error = %e, "Structured extraction failed, continuing with capture only")
                }
            }
        } else {
            info!(url = %self.target_url, "Not a documentation site, skipping structured extraction");
        }

        let mut capturer = PageCapturer::new(self.layout.screenshot_dir.clone());
        let outcome = match capturer.capture(&self.target_url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Browser capture failed, relying on screenshots already on disk");
                CaptureOutcome::default()
            }
        };
        capturer.shutdown().await;

        let screenshots = wait_for_captures(&self.layout.screenshot_dir, &self.wait).await;
        if screenshots.is_empty() {
            return Err(PipelineError::NoScreenshots);
        }
        self.stats.record_screenshots(screenshots.len() as u64);

        for path in &screenshots {
            let bytes = match tokio::fs::read(path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Screenshot unreadable, skipping");
                    self.stats.record_describe_failure();
                    continue;
                }
            };
            let mime = mime_for_path(&path.to_string_lossy());
            match self.vision.describe_image(&bytes, mime, DESCRIBE_PROMPT).await {
                Ok(description) => {
                    map.screenshot_descriptions.push(description);
                    self.stats.record_screenshot_description();
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Screenshot description failed, skipping");
                    self.stats.record_describe_failure();
                }
            }
        }

        map.image_count = outcome.image_urls.len();
        for image_url in &outcome.image_urls {
            match self.vision.describe_image_url(image_url, DESCRIBE_PROMPT).await {
                Ok(description) => {
                    map.image_descriptions.push(ImageDescription {
                        url: image_url.clone(),
                        description,
                    });
                    self.stats.record_image_description();
                }
                Err(e) => {
                    warn!(url = %image_url, error = %e, "Image description failed, skipping");
                    self.stats.record_describe_failure();
                }
            }
        }

        if let Err(e) = combine_captures(&screenshots, &self.layout.combined_file) {
            warn!(error = %e, "Screenshot stitching failed, continuing");
        }

        Ok(map)
    }

    fn load_cached_site_map(&self, path: &Path) -> Result<SiteMap, PipelineError> {
        match SiteMap::load(path) {
            Ok(map) => {
                if map.target_url != self.target_url {
                    warn!(
                        cached = %map.target_url,
                        requested = %self.target_url,
                        "Cached site map was built for a different URL"
                    );
                }
                Ok(map)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Cached site map unreadable");
                Err(PipelineError::SiteMapUnavailable(self.target_url.clone()))
            }
        }
    }

    // * Debug artifact only; indexing proceeds if this write fails
    fn dump_chunks(&self, chunks: &[String]) -> std::io::Result<()> {
        let path = &self.layout.chunk_dump_file;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut dump = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            dump.push_str(&format!(
                "==== Chunk {} ({} chars) ====\n{}\n\n",
                i + 1,
                chunk.chars().count(),
                chunk
            ));
        }
        std::fs::write(path, dump)
    }

    /// Answers a question against a ready index, using this orchestrator's
    /// embedding and generation backends
    pub async fn answer(
        &self,
        question: &str,
        search_index: &SearchIndex,
    ) -> Result<String, QaError> {
        index::answer(question, search_index, self.embedder.as_ref(), &self.vision).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::HashEmbedder;

    fn test_orchestrator(root: &Path) -> Orchestrator {
        Orchestrator::with_parts(
            "https://example.org/page",
            ArtifactLayout::new(root),
            WaitConfig::default(),
            PageExtractor::new().unwrap(),
            GeminiClient::new("test-key").unwrap(),
            Arc::new(HashEmbedder::new()),
        )
    }

    #[test]
    fn test_with_parts_wires_target_url() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = test_orchestrator(dir.path());
        assert_eq!(orchestrator.target_url(), "https://example.org/page");
        assert_eq!(orchestrator.stats(), PipelineStatsSnapshot::default());
    }

    #[test]
    fn test_dump_chunks_writes_numbered_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = test_orchestrator(dir.path());

        orchestrator
            .dump_chunks(&["first chunk".to_string(), "second chunk".to_string()])
            .unwrap();

        let dump = std::fs::read_to_string(&orchestrator.layout.chunk_dump_file).unwrap();
        assert!(dump.contains("==== Chunk 1 (11 chars) ===="));
        assert!(dump.contains("first chunk"));
        assert!(dump.contains("==== Chunk 2 (12 chars) ===="));
    }
}
