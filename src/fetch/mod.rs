//! Fetch Engine
//!
//! Two-stage retrieval of a page:
//!
//! 1. A static GET with the job's headers, timeout and redirect policy
//! 2. Optionally, a render pass through a [`Renderer`] (plus a mobile
//!    variant and a screenshot when enabled)
//!
//! Render problems never fail a fetch; the static body is used instead.
//! After every successful fetch the engine sleeps for the configured request
//! delay before returning, pacing each worker slot.

mod http;
mod render;

pub use http::{build_http_client, fetch_static, is_html_content_type, StaticResponse};
pub use render::{
    store_screenshot, BrowserlessRenderer, RenderError, RenderSession, Renderer, Viewport,
};

use crate::config::CrawlJobConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Per-URL fetch failure; recorded in the crawl stats, never fatal to the job
#[derive(Debug, Clone, Error)]
pub enum FetchFailure {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection error for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Protocol error for {url}: {message}")]
    Protocol { url: String, message: String },
}

/// Content retrieved for a page, ready for analysis
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: Url,
    /// URL after redirects
    pub final_url: Url,
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub content_type: String,
    /// Rendered HTML when a render succeeded, else the static body
    pub body: String,
    /// Transfer size of the static response
    pub bytes: usize,
    pub fetch_time: Duration,
    /// Set only when the render stage produced the body
    pub render_time: Option<Duration>,
    /// Rendered HTML at the mobile viewport
    pub mobile_body: Option<String>,
    pub screenshot: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Page(FetchedPage),
    /// The response was not HTML; skipped without a page record
    NotHtml { url: Url, content_type: String },
}

/// Anything that can turn a URL into page content
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchOutcome, FetchFailure>;
}

/// Render stage settings
#[derive(Clone)]
pub struct RenderStage {
    pub renderer: Arc<dyn Renderer>,
    pub mobile: bool,
    pub screenshot_dir: Option<PathBuf>,
}

/// The default [`Fetcher`]: static GET plus optional render
pub struct FetchEngine {
    client: Client,
    request_delay: Duration,
    render: Option<RenderStage>,
}

impl FetchEngine {
    pub fn new(client: Client, config: &CrawlJobConfig) -> Self {
        Self {
            client,
            request_delay: config.request_delay(),
            render: None,
        }
    }

    pub fn with_render_stage(mut self, stage: RenderStage) -> Self {
        self.render = Some(stage);
        self
    }

    async fn apply_render(&self, stage: &RenderStage, page: &mut FetchedPage) {
        let started = Instant::now();
        match stage.renderer.render(&page.final_url, Viewport::DESKTOP).await {
            Ok(html) => {
                page.body = html;
                page.render_time = Some(started.elapsed());
            }
            Err(e) => {
                warn!("Render failed for {}: {} (using static content)", page.url, e);
                return;
            }
        }

        if stage.mobile {
            match stage.renderer.render(&page.final_url, Viewport::MOBILE).await {
                Ok(html) => page.mobile_body = Some(html),
                Err(e) => warn!("Mobile render failed for {}: {}", page.url, e),
            }
        }

        if let Some(dir) = &stage.screenshot_dir {
            let stored = match stage.renderer.screenshot(&page.final_url).await {
                Ok(png) => store_screenshot(dir, &page.final_url, &png).await,
                Err(e) => Err(e),
            };
            match stored {
                Ok(path) => page.screenshot = Some(path),
                Err(e) => warn!("Screenshot failed for {}: {}", page.url, e),
            }
        }
    }
}

#[async_trait]
impl Fetcher for FetchEngine {
    async fn fetch(&self, url: &Url) -> Result<FetchOutcome, FetchFailure> {
        let response = fetch_static(&self.client, url).await?;

        if !response.is_html() {
            debug!("Skipping {} ({})", url, response.content_type);
            return Ok(FetchOutcome::NotHtml {
                url: url.clone(),
                content_type: response.content_type,
            });
        }

        let mut page = FetchedPage {
            url: url.clone(),
            final_url: response.final_url,
            status_code: response.status_code,
            headers: response.headers,
            content_type: response.content_type,
            body: response.body,
            bytes: response.bytes,
            fetch_time: response.elapsed,
            render_time: None,
            mobile_body: None,
            screenshot: None,
        };

        if let Some(stage) = &self.render {
            self.apply_render(stage, &mut page).await;
        }

        debug!(
            "Fetched {} (HTTP {}, {} bytes, {:?})",
            url, page.status_code, page.bytes, page.fetch_time
        );

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        Ok(FetchOutcome::Page(page))
    }
}
