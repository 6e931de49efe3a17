// * Wait-For-Artifacts Loop
// * Screenshot capture completes as an out-of-process side effect; polling the
// * screenshot folder is the synchronization primitive between the renderer
// * and the pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::constants::{
    ARTIFACT_POLL_SECS, ARTIFACT_WAIT_SECS, EXPECTED_SCREENSHOT_COUNT, SCREENSHOT_EXTENSION,
    SCREENSHOT_PREFIX,
};

/// Bounds for the artifact wait loop
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Minimum number of screenshot files considered complete
    pub expected_count: usize,
    /// Total wait bound; the loop returns whatever exists once it elapses
    pub max_wait: Duration,
    /// Sleep between folder polls
    pub check_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            expected_count: EXPECTED_SCREENSHOT_COUNT,
            max_wait: Duration::from_secs(ARTIFACT_WAIT_SECS),
            check_interval: Duration::from_secs(ARTIFACT_POLL_SECS),
        }
    }
}

/// Lists screenshot files in a folder, sorted by capture order
///
/// Filters to the screenshot extension and sorts by the numeric suffix of the
/// file stem, so `screenshot10` sorts after `screenshot2`. A missing folder
/// yields an empty list, matching the loop's tolerance for the renderer not
/// having created it yet.
pub async fn list_captures(folder: &Path) -> Vec<PathBuf> {
    let mut read_dir = match tokio::fs::read_dir(folder).await {
        Ok(rd) => rd,
        Err(_) => return Vec::new(),
    };

    let mut found: Vec<(u64, PathBuf)> = Vec::new();
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let path = entry.path();
        let is_capture = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(SCREENSHOT_EXTENSION))
            .unwrap_or(false);
        if !is_capture {
            continue;
        }
        found.push((capture_order(&path), path));
    }

    found.sort_by_key(|(order, _)| *order);
    found.into_iter().map(|(_, path)| path).collect()
}

// * Numeric suffix of the file stem; files outside the naming scheme sort last
fn capture_order(path: &Path) -> u64 {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.strip_prefix(SCREENSHOT_PREFIX))
        .and_then(|suffix| suffix.parse::<u64>().ok())
        .unwrap_or(u64::MAX)
}

/// Polls a folder until enough screenshot files exist or the bound elapses
///
/// Returns early once `expected_count` files are present. At `max_wait` the
/// last observed set is returned as-is; timing out is NOT an error here, only
/// the caller decides whether an empty final set is fatal.
pub async fn wait_for_captures(folder: &Path, config: &WaitConfig) -> Vec<PathBuf> {
    let started = Instant::now();
    let deadline = started + config.max_wait;

    loop {
        let found = list_captures(folder).await;
        if found.len() >= config.expected_count {
            info!(
                count = found.len(),
                expected = config.expected_count,
                "Screenshot set complete"
            );
            return found;
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(
                found = found.len(),
                expected = config.expected_count,
                waited_secs = config.max_wait.as_secs(),
                "Wait bound reached, returning partial screenshot set"
            );
            return found;
        }

        debug!(
            found = found.len(),
            expected = config.expected_count,
            elapsed_secs = started.elapsed().as_secs(),
            max_wait_secs = config.max_wait.as_secs(),
            "Waiting for screenshots"
        );

        // * Never sleep past the deadline
        let remaining = deadline - now;
        tokio::time::sleep(config.check_interval.min(remaining)).await;
    }
}
