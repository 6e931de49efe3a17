// * Telemetry - JSON Logging and Run Counters
// * Structured logging setup plus lightweight counters for what a pipeline
// * run actually did.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use sitelens::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(url = "https://example.com", "Processing page");
/// ```
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sitelens=debug,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .init();
}

/// Initializes tracing with custom log level
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty())
        .init();
}

/// Counters for one pipeline run
#[derive(Debug, Default)]
pub struct PipelineStats {
    screenshots: AtomicU64,
    screenshot_descriptions: AtomicU64,
    image_descriptions: AtomicU64,
    describe_failures: AtomicU64,
    chunks: AtomicU64,
    cache_hits: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStatsSnapshot {
    pub screenshots: u64,
    pub screenshot_descriptions: u64,
    pub image_descriptions: u64,
    pub describe_failures: u64,
    pub chunks: u64,
    pub cache_hits: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_screenshots(&self, count: u64) {
        self.screenshots.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_screenshot_description(&self) {
        self.screenshot_descriptions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_image_description(&self) {
        self.image_descriptions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_describe_failure(&self) {
        self.describe_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_chunks(&self, count: u64) {
        self.chunks.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PipelineStatsSnapshot {
        PipelineStatsSnapshot {
            screenshots: self.screenshots.load(Ordering::Relaxed),
            screenshot_descriptions: self.screenshot_descriptions.load(Ordering::Relaxed),
            image_descriptions: self.image_descriptions.load(Ordering::Relaxed),
            describe_failures: self.describe_failures.load(Ordering::Relaxed),
            chunks: self.chunks.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.screenshots.store(0, Ordering::Relaxed);
        self.screenshot_descriptions.store(0, Ordering::Relaxed);
        self.image_descriptions.store(0, Ordering::Relaxed);
        self.describe_failures.store(0, Ordering::Relaxed);
        self.chunks.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accumulate() {
        let stats = PipelineStats::new();

        stats.record_screenshots(3);
        stats.record_screenshot_description();
        stats.record_screenshot_description();
        stats.record_describe_failure();
        stats.record_chunks(12);
        stats.record_cache_hit();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.screenshots, 3);
        assert_eq!(snapshot.screenshot_descriptions, 2);
        assert_eq!(snapshot.image_descriptions, 0);
        assert_eq!(snapshot.describe_failures, 1);
        assert_eq!(snapshot.chunks, 12);
        assert_eq!(snapshot.cache_hits, 1);
    }

    #[test]
    fn test_stats_reset() {
        let stats = PipelineStats::new();
        stats.record_screenshots(5);
        stats.record_cache_hit();

        stats.reset();
        assert_eq!(stats.snapshot(), PipelineStatsSnapshot::default());
    }

    #[test]
    fn test_empty_snapshot_is_zeroed() {
        let stats = PipelineStats::new();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.screenshots, 0);
        assert_eq!(snapshot.cache_hits, 0);
    }
}
