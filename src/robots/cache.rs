//! Per-job robots.txt cache
//!
//! Entries are keyed by origin and expire after 24 hours. The cache is owned
//! by a single crawl job; concurrent first lookups for the same origin may
//! both fetch, and the later insert wins.

use crate::robots::RobotsPolicy;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Cached robots.txt policy for an origin
#[derive(Debug, Clone)]
pub struct CachedRobots {
    pub policy: RobotsPolicy,
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    pub fn new(policy: RobotsPolicy) -> Self {
        Self {
            policy,
            fetched_at: Utc::now(),
        }
    }

    /// Older than 24 hours
    pub fn is_stale(&self) -> bool {
        Utc::now() - self.fetched_at > Duration::hours(24)
    }
}

#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: RwLock<HashMap<String, CachedRobots>>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh policy for the origin, if one is cached
    pub async fn get(&self, origin: &str) -> Option<RobotsPolicy> {
        let entries = self.entries.read().await;
        entries
            .get(origin)
            .filter(|cached| !cached.is_stale())
            .map(|cached| cached.policy.clone())
    }

    pub async fn insert(&self, origin: String, policy: RobotsPolicy) {
        let mut entries = self.entries.write().await;
        entries.insert(origin, CachedRobots::new(policy));
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    #[cfg(test)]
    async fn insert_entry(&self, origin: String, entry: CachedRobots) {
        self.entries.write().await.insert(origin, entry);
    }
}
