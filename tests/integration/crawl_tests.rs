//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole crawl
//! jobs end-to-end, from the seed URL to the sink.

use async_trait::async_trait;
use seo_ripple::config::{load_config_with_hash, CrawlJobConfig};
use seo_ripple::crawler::{spawn_observer, CrawlEvent, Crawler};
use seo_ripple::fetch::{FetchFailure, FetchOutcome, FetchedPage, Fetcher};
use seo_ripple::output::{MemorySink, SqliteSink};
use seo_ripple::rules::IssueType;
use seo_ripple::JobStatus;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fast job settings for a local mock server
fn job_config(max_urls: usize, max_depth: u32) -> CrawlJobConfig {
    CrawlJobConfig {
        max_urls,
        max_depth,
        max_concurrent: 3,
        request_delay_ms: 0,
        timeout_secs: 5,
        user_agent: "TestBot/1.0".to_string(),
        ..CrawlJobConfig::default()
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Home page linking to `/p0`..`/p9`; every child page links back home
/// and to its neighbour
async fn mount_site(server: &MockServer) {
    let links: String = (0..10)
        .map(|i| format!(r#"<li><a href="/p{i}">Page {i}</a></li>"#))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html lang="en"><head><title>Home</title></head>
            <body><h1>Home</h1><ul>{links}</ul></body></html>"#
        )))
        .expect(1)
        .mount(server)
        .await;

    for i in 0..10 {
        let next = (i + 1) % 10;
        Mock::given(method("GET"))
            .and(path(format!("/p{i}")))
            .respond_with(html(format!(
                r#"<html><head><title>Page {i}</title></head><body>
                <h1>Page {i}</h1><a href="/">Home</a><a href="/p{next}">Next</a>
                </body></html>"#
            )))
            .expect(0..=1)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_crawl_stops_at_max_urls() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_site(&server).await;

    let crawler = Crawler::new(job_config(5, 1)).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.pages.len(), 5);
    assert_eq!(report.stats.successful, 5);
    assert!(sink.pages.iter().all(|(page, _)| page.depth <= 1));
    assert_eq!(sink.final_status, Some(JobStatus::Completed));
}

#[tokio::test]
async fn test_every_url_is_fetched_once() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_site(&server).await;

    let crawler = Crawler::new(job_config(100, 3)).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.pages.len(), 11);

    let mut urls = sink.urls();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 11);
}

#[tokio::test]
async fn test_robots_disallow_is_skipped_not_fetched() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><a href="/public">Public</a><a href="/private/data">Private</a></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(html("<html><body>Public</body></html>".to_string()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/data"))
        .respond_with(html("<html><body>Secret</body></html>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = Crawler::new(job_config(10, 2)).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.pages.len(), 2);
    assert_eq!(report.stats.skipped, 1);
}

#[tokio::test]
async fn test_robots_server_error_allows_crawling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html><body>Hello</body></html>".to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = Crawler::new(job_config(10, 0)).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.pages.len(), 1);
}

#[tokio::test]
async fn test_timeout_counts_as_failure() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><a href="/slow">Slow</a></body></html>"#.to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            html("<html><body>Late</body></html>".to_string()).set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = CrawlJobConfig {
        timeout_secs: 1,
        ..job_config(10, 1)
    };
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.pages.len(), 1);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.errors.len(), 1);
}

#[tokio::test]
async fn test_http_error_status_is_still_a_page() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><a href="/gone">Gone</a></body></html>"#.to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw("<html><head><title>Not found</title></head></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let crawler = Crawler::new(job_config(10, 1)).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.stats.failed, 0);
    let statuses: Vec<u16> = sink.pages.iter().map(|(p, _)| p.status_code).collect();
    assert!(statuses.contains(&404));
}

#[tokio::test]
async fn test_non_html_is_skipped() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><a href="/report.pdf">Report</a></body></html>"#.to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let crawler = Crawler::new(job_config(10, 1)).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(sink.pages.len(), 1);
    assert_eq!(report.stats.skipped, 1);
    assert_eq!(report.stats.failed, 0);
}

#[tokio::test]
async fn test_exclude_patterns_skip_urls() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><a href="/blog/post">Post</a><a href="/admin/login">Admin</a></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/post"))
        .respond_with(html("<html><body>Post</body></html>".to_string()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/login"))
        .respond_with(html("<html><body>Admin</body></html>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let config = CrawlJobConfig {
        exclude_patterns: vec!["/admin".to_string()],
        ..job_config(10, 1)
    };
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(sink.pages.len(), 2);
    assert!(sink.urls().iter().all(|url| !url.contains("/admin")));
}

#[tokio::test]
async fn test_issues_are_attached_to_pages() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            "<html><body><p>No title and no headings.</p></body></html>".to_string(),
        ))
        .mount(&server)
        .await;

    let crawler = Crawler::new(job_config(1, 0)).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    let (_, issues) = &sink.pages[0];
    let types: Vec<IssueType> = issues.iter().map(|issue| issue.issue_type).collect();
    assert!(types.contains(&IssueType::MissingTitle));
    assert!(types.contains(&IssueType::MissingH1));
    assert!(types.contains(&IssueType::NotHttps));
    assert_eq!(report.stats.total_issues, issues.len());
}

/// Tracks how many fetches run at the same time
struct CountingFetcher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchOutcome, FetchFailure> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let body = if url.path() == "/" {
            (0..20)
                .map(|i| format!(r#"<a href="/item/{i}">Item {i}</a>"#))
                .collect()
        } else {
            "<p>Item</p>".to_string()
        };
        Ok(FetchOutcome::Page(FetchedPage {
            url: url.clone(),
            final_url: url.clone(),
            status_code: 200,
            headers: BTreeMap::new(),
            content_type: "text/html".to_string(),
            bytes: body.len(),
            body,
            fetch_time: Duration::from_millis(20),
            render_time: None,
            mobile_body: None,
            screenshot: None,
        }))
    }
}

#[tokio::test]
async fn test_concurrency_never_exceeds_limit() {
    let fetcher = Arc::new(CountingFetcher {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let config = CrawlJobConfig {
        respect_robots: false,
        ..job_config(21, 1)
    };
    let crawler = Crawler::new(config)
        .expect("Failed to create crawler")
        .with_fetcher(fetcher.clone());

    let mut sink = MemorySink::new();
    let report = crawler
        .run("http://site.test/", &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.pages.len(), 21);
    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency was {}", peak);
    assert!(peak > 1);
}

#[tokio::test]
async fn test_cancellation_stops_between_batches() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_site(&server).await;

    let crawler = Crawler::new(job_config(100, 3)).expect("Failed to create crawler");
    let cancel = CancellationToken::new();
    let on_first_page = cancel.clone();
    let observer = spawn_observer(crawler.progress().subscribe(), move |event| {
        if let CrawlEvent::Progress(snapshot) = event {
            if snapshot.pages_crawled >= 1 {
                on_first_page.cancel();
            }
        }
        Ok(())
    });

    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, cancel)
        .await;
    drop(crawler);
    observer.await.expect("observer panicked");

    assert_eq!(report.status, JobStatus::Cancelled);
    assert!(sink.pages.len() < 11);
    assert_eq!(sink.final_status, Some(JobStatus::Cancelled));
}

#[tokio::test]
async fn test_sqlite_sink_end_to_end() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_site(&server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("crawl.db");

    let crawler = Crawler::new(job_config(4, 1)).expect("Failed to create crawler");
    let mut sink = SqliteSink::new(&db_path, "test-hash").expect("Failed to open database");
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.count_pages().unwrap(), 4);
    assert_eq!(sink.count_issues().unwrap(), report.stats.total_issues as u64);

    let job_id = sink.job_id().expect("job row was created");
    drop(sink);

    let reopened = SqliteSink::new(&db_path, "test-hash").expect("Failed to reopen database");
    assert_eq!(reopened.job_status(job_id).unwrap(), Some(JobStatus::Completed));
    assert_eq!(reopened.count_pages().unwrap(), 4);
}

#[tokio::test]
async fn test_config_file_drives_a_crawl() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_site(&server).await;

    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r#"
[crawl]
max-urls = 3
max-depth = 1
max-concurrent = 2
request-delay-ms = 0
timeout-secs = 5
user-agent = "ConfigBot/2.0"

[output]
database-path = "unused.db"
"#
    )
    .expect("Failed to write config");

    let (config, hash) = load_config_with_hash(file.path()).expect("Failed to load config");
    assert_eq!(hash.len(), 64);
    assert_eq!(config.crawl.robots_token(), "ConfigBot");

    let crawler = Crawler::new(config.crawl).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.pages.len(), 3);
}

#[tokio::test]
async fn test_off_site_redirect_does_not_expand() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    mount_robots(&site, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><a href="/go">Go</a></body></html>"#.to_string(),
        ))
        .mount(&site)
        .await;
    // Same IP as the site, different host name
    let elsewhere = format!("http://localhost:{}/", other.address().port());
    Mock::given(method("GET"))
        .and(path("/go"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", elsewhere.as_str()))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><a href="/secret">Secret</a></body></html>"#.to_string(),
        ))
        .mount(&other)
        .await;
    Mock::given(method("GET"))
        .and(path("/secret"))
        .respond_with(html("<html><body>Secret</body></html>".to_string()))
        .expect(0)
        .mount(&other)
        .await;

    let crawler = Crawler::new(job_config(10, 3)).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", site.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.pages.len(), 2);
    assert!(sink.urls().iter().all(|url| !url.contains("/secret")));

    let (redirected, _) = &sink.pages[1];
    assert!(redirected.url.ends_with("/go"));
    assert_eq!(redirected.final_url, elsewhere);
    assert!(redirected.internal_links.is_empty());
    assert_eq!(redirected.external_links.len(), 1);
}

#[tokio::test]
async fn test_redirect_target_is_recorded_once() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><a href="/old">Old</a><a href="/new">New</a></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html("<html><body>New home</body></html>".to_string()))
        .mount(&server)
        .await;

    let crawler = Crawler::new(job_config(10, 2)).expect("Failed to create crawler");
    let mut sink = MemorySink::new();
    let report = crawler
        .run(&format!("{}/", server.uri()), &mut sink, CancellationToken::new())
        .await;

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(sink.pages.len(), 2);
    assert_eq!(report.stats.skipped, 1);

    let new_url = format!("{}/new", server.uri());
    let landed_on_new = sink
        .pages
        .iter()
        .filter(|(page, _)| page.final_url == new_url)
        .count();
    assert_eq!(landed_on_new, 1);
}
