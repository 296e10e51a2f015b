//! Politeness Gate: robots.txt and include/exclude patterns

use crate::config::CrawlJobConfig;
use crate::robots::{fetch_robots, RobotsCache};
use crate::url::{origin_key, PatternFilter};
use reqwest::Client;
use tracing::debug;
use url::Url;

pub struct PolitenessGate {
    client: Client,
    cache: RobotsCache,
    agent_token: String,
    respect_robots: bool,
    filter: PatternFilter,
}

impl PolitenessGate {
    pub fn new(client: Client, config: &CrawlJobConfig) -> Self {
        Self {
            client,
            cache: RobotsCache::new(),
            agent_token: config.robots_token().to_string(),
            respect_robots: config.respect_robots,
            filter: PatternFilter::new(
                config.exclude_patterns.clone(),
                config.include_patterns.clone(),
            ),
        }
    }

    /// Whether robots.txt lets the job's user agent fetch `url`
    ///
    /// The first lookup for an origin fetches its robots.txt; later lookups
    /// use the job's cache until the entry goes stale.
    pub async fn allowed(&self, url: &Url) -> bool {
        if !self.respect_robots {
            return true;
        }

        let origin = origin_key(url);
        let policy = match self.cache.get(&origin).await {
            Some(policy) => policy,
            None => {
                let policy = fetch_robots(&self.client, &origin).await;
                self.cache.insert(origin, policy.clone()).await;
                policy
            }
        };

        let allowed = policy.allows(url.as_str(), &self.agent_token);
        if !allowed {
            debug!("{} disallowed by robots.txt", url);
        }
        allowed
    }

    pub fn excluded(&self, url: &Url) -> bool {
        self.filter.excluded(url)
    }

    pub fn cache(&self) -> &RobotsCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> CrawlJobConfig {
        CrawlJobConfig {
            user_agent: "TestBot/2.0".to_string(),
            ..CrawlJobConfig::default()
        }
    }

    #[tokio::test]
    async fn test_disallowed_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gate = PolitenessGate::new(Client::new(), &config());
        let private = Url::parse(&format!("{}/private/page", server.uri())).unwrap();
        let public = Url::parse(&format!("{}/public", server.uri())).unwrap();

        assert!(!gate.allowed(&private).await);
        assert!(gate.allowed(&public).await);
        assert_eq!(gate.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_agent_specific_rules_use_product_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("User-agent: TestBot\nDisallow: /\n"),
            )
            .mount(&server)
            .await;

        let gate = PolitenessGate::new(Client::new(), &config());
        let url = Url::parse(&format!("{}/anything", server.uri())).unwrap();
        assert!(!gate.allowed(&url).await);
    }

    #[tokio::test]
    async fn test_server_error_fails_open() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let gate = PolitenessGate::new(Client::new(), &config());
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        assert!(gate.allowed(&url).await);
    }

    #[tokio::test]
    async fn test_robots_ignored_when_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
            .expect(0)
            .mount(&server)
            .await;

        let config = CrawlJobConfig {
            respect_robots: false,
            ..config()
        };
        let gate = PolitenessGate::new(Client::new(), &config);
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        assert!(gate.allowed(&url).await);
    }

    #[test]
    fn test_excluded_uses_patterns() {
        let config = CrawlJobConfig {
            exclude_patterns: vec!["/admin".to_string()],
            ..config()
        };
        let gate = PolitenessGate::new(Client::new(), &config);
        assert!(gate.excluded(&Url::parse("https://example.com/admin/x").unwrap()));
        assert!(!gate.excluded(&Url::parse("https://example.com/blog").unwrap()));
    }
}
