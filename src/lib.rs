//! SEO-Ripple: a polite site crawler with on-page SEO analysis
//!
//! This crate crawls a single site within configurable bounds, fetches (and
//! optionally renders) each page, extracts a structured fact set, evaluates a
//! deterministic rule set and streams progress to any number of observers.

pub mod analyze;
pub mod config;
pub mod crawler;
pub mod fetch;
pub mod output;
pub mod robots;
pub mod rules;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for SEO-Ripple operations
///
/// Per-URL problems never surface here; they are counted in the crawl
/// statistics. These are the job-level errors that move a crawl to `failed`.
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Sink error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("Render service error: {0}")]
    Render(#[from] fetch::RenderError),

    #[error("Invalid job transition: {from} -> {to}")]
    InvalidTransition {
        from: state::JobStatus,
        to: state::JobStatus,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for SEO-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analyze::PageRecord;
pub use config::{Config, CrawlJobConfig};
pub use crawler::{CrawlReport, Crawler};
pub use rules::{IssueRecord, RuleEngine};
pub use state::JobStatus;
pub use url::normalize_url;
