//! Crawl frontier: FIFO queue plus the visited set
//!
//! A URL enters the queue at most once and is dispatched at most once; both
//! checks use the normalized URL string as the key.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized, absolute, without fragment
    pub url: Url,
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an entry unless it was already queued or visited
    ///
    /// Returns true when the entry was added.
    pub fn push(&mut self, entry: FrontierEntry) -> bool {
        let key = entry.url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }
        self.queued.insert(key.to_string());
        self.queue.push_back(entry);
        true
    }

    /// Take up to `limit` entries at or below `max_depth`, marking each visited
    pub fn next_batch(&mut self, limit: usize, max_depth: u32) -> Vec<FrontierEntry> {
        let mut batch = Vec::with_capacity(limit);
        while batch.len() < limit {
            let Some(entry) = self.queue.pop_front() else {
                break;
            };
            let key = entry.url.as_str().to_string();
            self.queued.remove(&key);

            if entry.depth > max_depth || !self.visited.insert(key) {
                continue;
            }
            batch.push(entry);
        }
        batch
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Record a URL as crawled without dispatching it
    ///
    /// Used for redirect targets: a queued copy is dropped when its turn
    /// comes. Returns false when the URL was already visited.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
