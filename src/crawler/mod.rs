//! Crawler module: scheduling, politeness and progress
//!
//! - [`Frontier`]: FIFO queue of URLs plus the visited set
//! - [`PolitenessGate`]: robots.txt and include/exclude patterns
//! - [`Crawler`]: the batch loop that drives a job to a terminal state
//! - [`ProgressHub`]: statistics snapshots and status events for observers

mod coordinator;
mod frontier;
mod gate;
mod progress;

pub use coordinator::{CrawlReport, Crawler};
pub use frontier::{Frontier, FrontierEntry};
pub use gate::PolitenessGate;
pub use progress::{
    join_observer, spawn_observer, CrawlEvent, CrawlStats, ProgressHub, ProgressSnapshot,
};
