//! Robots.txt policy wrapper around the `robotstxt` matcher

use robotstxt::DefaultMatcher;

/// Crawl policy for one origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsPolicy {
    /// No robots.txt, a 4xx, or a fetch that failed open
    Unrestricted,
    /// Raw robots.txt body, matched on demand
    Rules(String),
}

impl RobotsPolicy {
    pub fn from_content(content: &str) -> Self {
        if content.trim().is_empty() {
            Self::Unrestricted
        } else {
            Self::Rules(content.to_string())
        }
    }

    /// Checks a full URL against the policy for the given product token
    pub fn allows(&self, url: &str, agent_token: &str) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Rules(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, agent_token, url)
            }
        }
    }
}
