//! Static HTTP fetching
//!
//! Builds the job's HTTP client and performs the plain GET stage of a fetch,
//! classifying transport errors into [`FetchFailure`] kinds.

use crate::config::CrawlJobConfig;
use crate::fetch::FetchFailure;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use url::Url;

/// Maximum redirect hops followed when redirects are enabled
const MAX_REDIRECTS: usize = 10;

/// Raw result of the static GET stage
#[derive(Debug, Clone)]
pub struct StaticResponse {
    /// URL after redirects
    pub final_url: Url,
    pub status_code: u16,
    /// Lower-cased header names; repeated headers are joined with ", "
    pub headers: BTreeMap<String, String>,
    pub content_type: String,
    pub body: String,
    pub bytes: usize,
    pub elapsed: Duration,
}

impl StaticResponse {
    pub fn is_html(&self) -> bool {
        is_html_content_type(&self.content_type)
    }
}

/// Builds the HTTP client shared by every fetch and robots lookup of a job
///
/// # Example
///
/// ```no_run
/// use seo_ripple::config::CrawlJobConfig;
/// use seo_ripple::fetch::build_http_client;
///
/// let client = build_http_client(&CrawlJobConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlJobConfig) -> Result<Client, reqwest::Error> {
    let redirect = if config.follow_redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    let mut headers = HeaderMap::new();
    for (name, value) in &config.custom_headers {
        // Validated at config load; anything unparseable here is skipped
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(config.timeout().min(Duration::from_secs(10)))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs the static GET for a URL
///
/// Any HTTP status is a successful response here; only transport problems
/// (timeout, connection, body decoding) produce a [`FetchFailure`].
pub async fn fetch_static(client: &Client, url: &Url) -> Result<StaticResponse, FetchFailure> {
    let started = Instant::now();

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status_code = response.status().as_u16();
    let final_url = response.url().clone();
    let headers = collect_headers(response.headers());
    let content_type = headers.get(CONTENT_TYPE.as_str()).cloned().unwrap_or_default();

    let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
    let elapsed = started.elapsed();

    Ok(StaticResponse {
        final_url,
        status_code,
        headers,
        content_type,
        body: String::from_utf8_lossy(&bytes).into_owned(),
        bytes: bytes.len(),
        elapsed,
    })
}

/// Missing content type is treated as HTML
pub fn is_html_content_type(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.is_empty() || ct.contains("text/html") || ct.contains("application/xhtml+xml")
}

fn collect_headers(map: &HeaderMap) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in map {
        let Ok(value) = value.to_str() else { continue };
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    headers
}

fn classify_error(url: &Url, e: reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchFailure::Connect {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        FetchFailure::Protocol {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
