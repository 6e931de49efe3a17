// * Process configuration from the environment
// * URL and API_KEY are required; SITELENS_WORKDIR overrides the artifact root

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::constants::DEFAULT_WORKDIR;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
}

/// Runtime settings resolved at process start
#[derive(Debug, Clone)]
pub struct Settings {
    /// Target page to ingest
    pub target_url: String,
    /// Credential for the language/embedding model
    pub api_key: String,
    /// Root directory for every on-disk artifact
    pub workdir: PathBuf,
}

impl Settings {
    /// Reads settings from the environment
    ///
    /// Recognized variables: `URL` (required), `API_KEY` (required),
    /// `SITELENS_WORKDIR` (optional, defaults to `./sitelens_data`).
    pub fn from_env() -> Result<Self, SettingsError> {
        let target_url = read_var("URL")?;
        let api_key = read_var("API_KEY")?;
        let workdir = std::env::var("SITELENS_WORKDIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WORKDIR));

        Ok(Self {
            target_url,
            api_key,
            workdir,
        })
    }

    /// Returns the artifact layout rooted at the configured work directory
    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.workdir)
    }
}

fn read_var(name: &'static str) -> Result<String, SettingsError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SettingsError::Missing(name)),
    }
}

/// Fixed artifact paths under one work directory
///
/// Every stage addresses its inputs and outputs through this struct, so the
/// whole pipeline can be pointed at a scratch directory in tests.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    pub root: PathBuf,
    /// The SiteMap document; its existence is cache gate A
    pub sitemap_file: PathBuf,
    /// ScreenshotSet folder, written by the capturer, polled by the wait loop
    pub screenshot_dir: PathBuf,
    /// Chunk list dump, overwritten each indexing run
    pub chunk_dump_file: PathBuf,
    /// Vertically stitched screenshot column
    pub combined_file: PathBuf,
    /// Persisted index directory; its existence is cache gate B
    pub index_dir: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            sitemap_file: root.join("sitemap.json"),
            screenshot_dir: root.join("screenshots"),
            chunk_dump_file: root.join("debug").join("chunks.txt"),
            combined_file: root.join("debug").join("combined_screenshots.png"),
            index_dir: root.join("index"),
            root,
        }
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self::new(DEFAULT_WORKDIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths_share_root() {
        let layout = ArtifactLayout::new("/tmp/sitelens-test");

        assert_eq!(layout.sitemap_file, Path::new("/tmp/sitelens-test/sitemap.json"));
        assert_eq!(layout.screenshot_dir, Path::new("/tmp/sitelens-test/screenshots"));
        assert_eq!(
            layout.chunk_dump_file,
            Path::new("/tmp/sitelens-test/debug/chunks.txt")
        );
        assert_eq!(layout.index_dir, Path::new("/tmp/sitelens-test/index"));
    }

    #[test]
    fn test_default_layout_uses_default_workdir() {
        let layout = ArtifactLayout::default();
        assert!(layout.root.ends_with("sitelens_data"));
    }
}
