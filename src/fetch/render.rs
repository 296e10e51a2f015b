//! Headless rendering through a Browserless-compatible HTTP service
//!
//! The render stage is optional. A [`RenderSession`] is opened once per job
//! and must be closed on every exit path; if it is dropped while still open,
//! closing is handed to the runtime.

use crate::config::RenderConfig;
use async_trait::async_trait;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to store screenshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render session already closed")]
    Closed,
}

impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        RenderError::Network(err.to_string())
    }
}

/// Browser viewport used for a render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub mobile: bool,
}

impl Viewport {
    pub const DESKTOP: Viewport = Viewport {
        width: 1366,
        height: 768,
        mobile: false,
    };

    pub const MOBILE: Viewport = Viewport {
        width: 375,
        height: 812,
        mobile: true,
    };
}

/// A headless browser backend
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Prepares the backend for a job
    async fn open(&self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Fully rendered HTML after network idle plus the settle delay
    async fn render(&self, url: &Url, viewport: Viewport) -> Result<String, RenderError>;

    /// Full-page PNG
    async fn screenshot(&self, url: &Url) -> Result<Vec<u8>, RenderError>;

    /// Releases backend resources held for the job
    async fn close(&self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Client for the Browserless `/content` and `/screenshot` endpoints
pub struct BrowserlessRenderer {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    user_agent: String,
    settle_delay: Duration,
}

impl BrowserlessRenderer {
    pub fn new(
        config: &RenderConfig,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, RenderError> {
        // Rendering waits for network idle plus the settle delay on top of
        // the page load itself
        let client = reqwest::Client::builder()
            .timeout(timeout + config.settle_delay() + Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            user_agent: user_agent.to_string(),
            settle_delay: config.settle_delay(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        let mut endpoint = format!("{}/{}", self.base_url, path);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response, RenderError> {
        let resp = self
            .client
            .post(self.endpoint(path))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RenderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp)
    }
}

#[async_trait]
impl Renderer for BrowserlessRenderer {
    async fn render(&self, url: &Url, viewport: Viewport) -> Result<String, RenderError> {
        let body = json!({
            "url": url.as_str(),
            "userAgent": self.user_agent,
            "gotoOptions": { "waitUntil": "networkidle0" },
            "waitForTimeout": self.settle_delay.as_millis() as u64,
            "viewport": {
                "width": viewport.width,
                "height": viewport.height,
                "isMobile": viewport.mobile,
                "hasTouch": viewport.mobile,
            },
        });

        let resp = self.post("content", body).await?;
        Ok(resp.text().await?)
    }

    async fn screenshot(&self, url: &Url) -> Result<Vec<u8>, RenderError> {
        let body = json!({
            "url": url.as_str(),
            "userAgent": self.user_agent,
            "gotoOptions": { "waitUntil": "networkidle0" },
            "options": { "fullPage": true, "type": "png" },
        });

        let resp = self.post("screenshot", body).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}

/// A render backend held open for the duration of one crawl job
pub struct RenderSession {
    renderer: Arc<dyn Renderer>,
    closed: bool,
}

impl RenderSession {
    pub async fn open(renderer: Arc<dyn Renderer>) -> Result<Self, RenderError> {
        renderer.open().await?;
        debug!("Render session opened");
        Ok(Self {
            renderer,
            closed: false,
        })
    }

    /// Shared handle used by the fetch stage while the session is open
    pub fn renderer(&self) -> Arc<dyn Renderer> {
        Arc::clone(&self.renderer)
    }

    pub async fn close(mut self) -> Result<(), RenderError> {
        self.closed = true;
        let result = self.renderer.close().await;
        debug!("Render session closed");
        result
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        let renderer = Arc::clone(&self.renderer);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = renderer.close().await {
                        warn!("Failed to close render session: {}", e);
                    }
                });
            }
            Err(_) => warn!("Render session dropped outside a runtime; not closed"),
        }
    }
}

/// Writes a screenshot as `<sha256(url)>.png` under `dir`
pub async fn store_screenshot(dir: &Path, url: &Url, png: &[u8]) -> Result<PathBuf, RenderError> {
    tokio::fs::create_dir_all(dir).await?;

    let mut hasher = Sha256::new();
    hasher.update(url.as_str().as_bytes());
    let path = dir.join(format!("{}.png", hex::encode(hasher.finalize())));

    tokio::fs::write(&path, png).await?;
    Ok(path)
}
