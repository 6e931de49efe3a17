// * Image Capture Gateway - Headless Browser Rendering
// * Uses ChromiumOxide to render the target page, walk it viewport by
// * viewport saving numbered screenshots, and harvest same-page image URLs
// * from the final DOM.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::capture::images::harvest_image_urls;
use crate::config::constants::{
    MAX_SCREENSHOTS, PAGE_TIMEOUT_MS, SCREENSHOT_EXTENSION, SCREENSHOT_PREFIX, SCROLL_SETTLE_MS,
    SETTLE_DELAY_MS,
};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Page navigation failed: {0}")]
    Navigation(String),

    #[error("Page timeout after {0}ms")]
    Timeout(u64),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Content extraction failed: {0}")]
    ContentExtraction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one capture run
///
/// Both the screenshot paths and the discovered image URLs are threaded back
/// through this value; the capturer keeps no cross-run state.
#[derive(Debug, Default)]
pub struct CaptureOutcome {
    /// Saved screenshot files in capture order
    pub screenshots: Vec<PathBuf>,
    /// Absolute, extension-filtered image URLs from the rendered page
    pub image_urls: Vec<String>,
}

// * PageCapturer manages the headless browser instance
pub struct PageCapturer {
    screenshot_dir: PathBuf,
    browser: Option<Browser>,
    handler: Option<tokio::task::JoinHandle<()>>,
}

impl PageCapturer {
    // * Creates a new capturer (browser not launched until needed)
    pub fn new(screenshot_dir: PathBuf) -> Self {
        Self {
            screenshot_dir,
            browser: None,
            handler: None,
        }
    }

    // * Launches the browser if not already running
    async fn ensure_browser(&mut self) -> Result<&Browser, CaptureError> {
        if self.browser.is_none() {
            let config = BrowserConfig::builder()
                .no_sandbox()
                .viewport(None)
                .arg("--disable-dev-shm-usage")
                .arg("--disable-gpu")
                .arg("--hide-scrollbars")
                .arg("--window-size=1280,1024")
                .build()
                .map_err(CaptureError::BrowserLaunch)?;

            let (browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| CaptureError::BrowserLaunch(e.to_string()))?;

            // * Spawn handler in background
            let handle = tokio::spawn(async move {
                while let Some(_event) = handler.next().await {
                    // * Process browser events
                }
            });

            self.browser = Some(browser);
            self.handler = Some(handle);
            info!("Capture browser launched");
        }

        Ok(self.browser.as_ref().unwrap())
    }

    /// Renders the page, captures at each scroll stop, and harvests image URLs
    ///
    /// Screenshots land in the capturer's screenshot folder as
    /// `screenshot{i}.png` in capture order. Existing files from earlier runs
    /// keep their slots overwritten, never deleted.
    pub async fn capture(&mut self, url: &str) -> Result<CaptureOutcome, CaptureError> {
        tokio::fs::create_dir_all(&self.screenshot_dir).await?;
        let screenshot_dir = self.screenshot_dir.clone();
        let browser = self.ensure_browser().await?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CaptureError::Navigation(e.to_string()))?;

        // * Navigate with timeout
        let timeout = Duration::from_millis(PAGE_TIMEOUT_MS);
        match tokio::time::timeout(timeout, page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(CaptureError::Navigation(e.to_string())),
            Err(_) => return Err(CaptureError::Timeout(PAGE_TIMEOUT_MS)),
        }

        // * Wait for late content, then pin the viewport to the top
        tokio::time::sleep(Duration::from_millis(SETTLE_DELAY_MS)).await;
        page.evaluate("window.scrollTo(0, 0)")
            .await
            .map_err(|e| CaptureError::Script(e.to_string()))?;

        let viewport_height = eval_number(&page, "window.innerHeight").await?.max(1.0);
        let mut total_height = eval_number(&page, "document.body.scrollHeight").await?;

        let mut screenshots: Vec<PathBuf> = Vec::new();
        let mut offset = 0.0;
        loop {
            let path = screenshot_dir.join(format!(
                "{}{}.{}",
                SCREENSHOT_PREFIX,
                screenshots.len(),
                SCREENSHOT_EXTENSION
            ));
            page.save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build(),
                &path,
            )
            .await
            .map_err(|e| CaptureError::Screenshot(e.to_string()))?;
            debug!(path = %path.display(), "Saved screenshot");
            screenshots.push(path);

            offset += viewport_height;
            if offset >= total_height || screenshots.len() >= MAX_SCREENSHOTS {
                break;
            }

            page.evaluate(format!("window.scrollTo(0, {offset})"))
                .await
                .map_err(|e| CaptureError::Script(e.to_string()))?;
            tokio::time::sleep(Duration::from_millis(SCROLL_SETTLE_MS)).await;

            // * Lazy-loading pages grow while we scroll; re-read the height
            total_height = eval_number(&page, "document.body.scrollHeight").await?;
        }

        // * Harvest image URLs from the final DOM, resolved against the
        // * post-redirect URL
        let final_url = page
            .url()
            .await
            .map_err(|e| CaptureError::ContentExtraction(e.to_string()))?
            .unwrap_or_else(|| url.to_string());
        let html = page
            .content()
            .await
            .map_err(|e| CaptureError::ContentExtraction(e.to_string()))?;
        let image_urls = harvest_image_urls(&html, &final_url);

        let _ = page.close().await;

        info!(
            screenshots = screenshots.len(),
            image_urls = image_urls.len(),
            "Capture complete"
        );

        Ok(CaptureOutcome {
            screenshots,
            image_urls,
        })
    }

    // * Closes the browser gracefully
    pub async fn shutdown(&mut self) {
        if let Some(mut browser) = self.browser.take() {
            let _ = browser.close().await;
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        debug!("PageCapturer shutdown complete");
    }
}

impl Drop for PageCapturer {
    fn drop(&mut self) {
        // * Best effort cleanup - can't await in drop
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

async fn eval_number(page: &Page, expr: &str) -> Result<f64, CaptureError> {
    page.evaluate(expr)
        .await
        .map_err(|e| CaptureError::Script(e.to_string()))?
        .into_value::<f64>()
        .map_err(|e| CaptureError::Script(e.to_string()))
}
