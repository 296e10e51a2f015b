//! Progress Aggregator
//!
//! Crawl statistics plus a broadcast stream of [`CrawlEvent`]s. Observers
//! subscribe to the [`ProgressHub`]; a slow or failing observer never holds
//! up the crawl.

use crate::analyze::round2;
use crate::state::JobStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 256;

/// Running totals for one job
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Robots, pattern and non-HTML skips; not failures
    pub skipped: usize,
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    /// Mean fetch time of successful pages, milliseconds
    pub avg_load_time: f64,
    pub total_issues: usize,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self {
            total: 0,
            successful: 0,
            failed: 0,
            skipped: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            avg_load_time: 0.0,
            total_issues: 0,
        }
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, load_time_ms: u64, issues: usize) {
        self.total += 1;
        self.successful += 1;
        self.total_issues += issues;
        let n = self.successful as f64;
        self.avg_load_time += (load_time_ms as f64 - self.avg_load_time) / n;
    }

    pub fn record_failure(&mut self, error: String) {
        self.total += 1;
        self.failed += 1;
        self.errors.push(error);
    }

    pub fn record_skip(&mut self) {
        self.total += 1;
        self.skipped += 1;
    }

    pub fn snapshot(&self, queue_size: usize, current_url: Option<String>) -> ProgressSnapshot {
        ProgressSnapshot {
            pages_crawled: self.successful,
            failed: self.failed,
            queue_size,
            current_url,
            avg_load_time: round2(self.avg_load_time),
            total_issues: self.total_issues,
        }
    }
}

/// Immutable view of a job's progress after one dispatch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub pages_crawled: usize,
    pub failed: usize,
    pub queue_size: usize,
    pub current_url: Option<String>,
    pub avg_load_time: f64,
    pub total_issues: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CrawlEvent {
    Status {
        status: JobStatus,
        message: Option<String>,
    },
    Progress(ProgressSnapshot),
}

/// Fan-out of crawl events to any number of observers
#[derive(Debug, Clone)]
pub struct ProgressHub {
    sender: broadcast::Sender<CrawlEvent>,
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CrawlEvent> {
        self.sender.subscribe()
    }

    /// Sends to current subscribers; having none is not an error
    pub fn publish(&self, event: CrawlEvent) {
        if self.sender.send(event).is_err() {
            debug!("No progress subscribers");
        }
    }

    pub fn publish_status(&self, status: JobStatus, message: Option<String>) {
        self.publish(CrawlEvent::Status { status, message });
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Runs `observer` for every event on its own task
///
/// Observer errors are logged and the observer keeps receiving. The task ends
/// when the hub is dropped.
pub fn spawn_observer<F>(mut receiver: broadcast::Receiver<CrawlEvent>, mut observer: F) -> JoinHandle<()>
where
    F: FnMut(CrawlEvent) -> anyhow::Result<()> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = observer(event) {
                        warn!("Progress observer failed: {:#}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Progress observer lagged, {} events dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Wait for an observer task to drain; a panicked task is logged, not propagated
pub async fn join_observer(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!("Progress observer task ended abnormally: {}", e);
            false
        }
    }
}
