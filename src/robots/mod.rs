//! Robots.txt handling module
//!
//! Fetching, parsing and per-job caching of robots.txt policies. Any failure
//! to obtain a policy fails open: the origin is treated as unrestricted.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::RobotsPolicy;

use reqwest::Client;
use tracing::{debug, warn};

/// Fetches and parses `{origin}/robots.txt`
///
/// * 2xx: the body is parsed
/// * 4xx: no policy, everything allowed
/// * 5xx or transport error: everything allowed, with a warning
pub async fn fetch_robots(client: &Client, origin: &str) -> RobotsPolicy {
    let robots_url = format!("{}/robots.txt", origin.trim_end_matches('/'));

    let response = match client.get(&robots_url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to fetch {}: {} (allowing all)", robots_url, e);
            return RobotsPolicy::Unrestricted;
        }
    };

    let status = response.status();
    if status.is_success() {
        match response.text().await {
            Ok(body) => {
                debug!("Loaded {} ({} bytes)", robots_url, body.len());
                RobotsPolicy::from_content(&body)
            }
            Err(e) => {
                warn!("Failed to read {}: {} (allowing all)", robots_url, e);
                RobotsPolicy::Unrestricted
            }
        }
    } else if status.is_client_error() {
        debug!("No robots.txt at {} (HTTP {})", robots_url, status.as_u16());
        RobotsPolicy::Unrestricted
    } else {
        warn!(
            "robots.txt at {} returned HTTP {} (allowing all)",
            robots_url,
            status.as_u16()
        );
        RobotsPolicy::Unrestricted
    }
}
