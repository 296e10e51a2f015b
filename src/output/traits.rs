//! Persistence seam for crawl results
//!
//! The crawler hands every produced page and its issues to a [`PageSink`]
//! and keeps nothing itself. A sink error is fatal to the job.

use crate::analyze::PageRecord;
use crate::crawler::CrawlReport;
use crate::rules::IssueRecord;
use thiserror::Error;

/// Errors that can occur while persisting crawl results
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink rejected record: {0}")]
    Rejected(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

pub trait PageSink: Send {
    /// Called once before the first page
    fn job_started(&mut self, _seed: &str) -> SinkResult<()> {
        Ok(())
    }

    fn accept(&mut self, page: &PageRecord, issues: &[IssueRecord]) -> SinkResult<()>;

    /// Called once with the terminal report, on every exit path
    fn job_finished(&mut self, _report: &CrawlReport) -> SinkResult<()> {
        Ok(())
    }
}
