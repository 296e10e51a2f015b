use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for SEO-Ripple
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlJobConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Bounds and behavior of a single crawl job
///
/// Immutable once the job starts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlJobConfig {
    /// Maximum number of pages produced by the job
    #[serde(rename = "max-urls")]
    pub max_urls: usize,

    /// Maximum link depth from the seed (seed is depth 0)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages in flight at once
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: usize,

    /// Pause after each successful fetch, per worker slot (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Extra headers sent with every static fetch
    #[serde(rename = "custom-headers")]
    pub custom_headers: BTreeMap<String, String>,

    #[serde(rename = "follow-redirects")]
    pub follow_redirects: bool,

    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,

    /// Render pages through the render service before analysis
    #[serde(rename = "render-enabled")]
    pub render_enabled: bool,

    /// Capture a mobile-viewport variant (requires rendering)
    #[serde(rename = "mobile-analysis-enabled")]
    pub mobile_analysis_enabled: bool,

    /// Capture a full-page screenshot (requires rendering)
    #[serde(rename = "screenshot-enabled")]
    pub screenshot_enabled: bool,

    /// Substrings; a URL containing any of them is skipped
    #[serde(rename = "exclude-patterns")]
    pub exclude_patterns: Vec<String>,

    /// Substrings; when non-empty, a URL must contain one of them
    #[serde(rename = "include-patterns")]
    pub include_patterns: Vec<String>,
}

impl Default for CrawlJobConfig {
    fn default() -> Self {
        Self {
            max_urls: 100,
            max_depth: 3,
            max_concurrent: 5,
            request_delay_ms: 1000,
            timeout_secs: 30,
            user_agent: "SEO-Ripple-Bot/1.0".to_string(),
            custom_headers: BTreeMap::new(),
            follow_redirects: true,
            respect_robots: true,
            render_enabled: false,
            mobile_analysis_enabled: false,
            screenshot_enabled: false,
            exclude_patterns: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

impl CrawlJobConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Product token of the user agent, used for robots.txt group matching
    pub fn robots_token(&self) -> &str {
        self.user_agent
            .split('/')
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.user_agent)
    }
}

/// Render service (Browserless-compatible) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Base URL of the render service
    pub endpoint: String,

    /// Optional API token, appended as `?token=`
    pub token: Option<String>,

    /// Extra wait after network idle before the DOM is captured (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Directory screenshots are written to
    #[serde(rename = "screenshot-dir")]
    pub screenshot_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000".to_string(),
            token: None,
            settle_delay_ms: 2000,
            screenshot_dir: PathBuf::from("./screenshots"),
        }
    }
}

impl RenderConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./seo-ripple.db".to_string(),
        }
    }
}
