//! Frontier Scheduler - main crawl orchestration
//!
//! A job runs in batches: take up to `min(max_concurrent, max_urls -
//! produced)` entries from the frontier, run gate -> fetch -> analyze ->
//! rules for all of them concurrently, then hand results to the sink and
//! grow the frontier. Cancellation is checked between batches; an in-flight
//! batch always completes.

use crate::analyze::{EntityExtractor, PageAnalyzer, PageRecord};
use crate::config::{CrawlJobConfig, RenderConfig};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::gate::PolitenessGate;
use crate::crawler::progress::{CrawlEvent, CrawlStats, ProgressHub};
use crate::fetch::{
    build_http_client, BrowserlessRenderer, FetchEngine, FetchOutcome, Fetcher, RenderSession,
    RenderStage, Renderer,
};
use crate::output::PageSink;
use crate::rules::{IssueRecord, RuleEngine};
use crate::state::JobStatus;
use crate::url::{normalize_url, same_host};
use crate::RippleError;
use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

/// Terminal summary of a job
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub status: JobStatus,
    pub stats: CrawlStats,
    pub elapsed: Duration,
    pub error: Option<String>,
}

/// Result of dispatching one frontier entry
enum Dispatch {
    Produced {
        entry: FrontierEntry,
        page: Box<PageRecord>,
        issues: Vec<IssueRecord>,
    },
    Skipped {
        entry: FrontierEntry,
        reason: String,
    },
    Failed {
        entry: FrontierEntry,
        error: String,
    },
}

pub struct Crawler {
    config: CrawlJobConfig,
    render_config: RenderConfig,
    client: Client,
    fetcher: Option<Arc<dyn Fetcher>>,
    renderer: Option<Arc<dyn Renderer>>,
    analyzer: PageAnalyzer,
    rules: RuleEngine,
    progress: ProgressHub,
}

impl Crawler {
    pub fn new(config: CrawlJobConfig) -> Result<Self, RippleError> {
        let client = build_http_client(&config)?;
        Ok(Self {
            config,
            render_config: RenderConfig::default(),
            client,
            fetcher: None,
            renderer: None,
            analyzer: PageAnalyzer::new(),
            rules: RuleEngine::new(),
            progress: ProgressHub::new(),
        })
    }

    /// Replaces the default static + render fetch engine
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Render backend used when rendering is enabled; defaults to Browserless
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_render_config(mut self, render_config: RenderConfig) -> Self {
        self.render_config = render_config;
        self
    }

    pub fn with_entity_extractor(mut self, extractor: Arc<dyn EntityExtractor>) -> Self {
        self.analyzer = self.analyzer.with_entity_extractor(extractor);
        self
    }

    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn progress(&self) -> &ProgressHub {
        &self.progress
    }

    /// Runs one job from `seed` to a terminal state
    ///
    /// Per-URL problems are counted in the stats. A sink error, an invalid
    /// seed or a render session that cannot be opened ends the job as
    /// `failed`; pages already handed to the sink stay valid.
    pub async fn run(
        &self,
        seed: &str,
        sink: &mut dyn PageSink,
        cancel: CancellationToken,
    ) -> CrawlReport {
        let started = Instant::now();
        let mut status = JobStatus::Pending;
        let mut stats = CrawlStats::new();

        let outcome = match self.start(&mut status, seed, sink).await {
            Ok((seed_url, session)) => {
                let result = self
                    .crawl_loop(seed_url, session.as_ref(), sink, &cancel, &mut stats)
                    .await;
                if let Some(session) = session {
                    if let Err(e) = session.close().await {
                        warn!("Failed to close render session: {}", e);
                    }
                }
                result
            }
            Err(e) => Err(e),
        };

        let (target, error) = match outcome {
            Ok(true) => (JobStatus::Cancelled, None),
            Ok(false) => (JobStatus::Completed, None),
            Err(e) => {
                error!("Crawl failed: {}", e);
                (JobStatus::Failed, Some(e.to_string()))
            }
        };
        self.set_status(&mut status, target, error.clone());

        let report = CrawlReport {
            status,
            stats,
            elapsed: started.elapsed(),
            error,
        };
        if let Err(e) = sink.job_finished(&report) {
            error!("Failed to record job result: {}", e);
        }

        info!(
            "Crawl {}: {} pages, {} failed, {} skipped, {} issues in {:?}",
            report.status,
            report.stats.successful,
            report.stats.failed,
            report.stats.skipped,
            report.stats.total_issues,
            report.elapsed
        );
        report
    }

    async fn start(
        &self,
        status: &mut JobStatus,
        seed: &str,
        sink: &mut dyn PageSink,
    ) -> Result<(Url, Option<RenderSession>), RippleError> {
        *status = status.transition(JobStatus::Running)?;
        self.progress.publish_status(*status, None);
        info!("Starting crawl of {}", seed);

        let seed_url = normalize_url(seed)?;
        sink.job_started(seed_url.as_str())?;

        let session = if self.config.render_enabled {
            let renderer = match &self.renderer {
                Some(renderer) => Arc::clone(renderer),
                None => Arc::new(BrowserlessRenderer::new(
                    &self.render_config,
                    &self.config.user_agent,
                    self.config.timeout(),
                )?),
            };
            Some(RenderSession::open(renderer).await?)
        } else {
            None
        };

        Ok((seed_url, session))
    }

    /// Returns `Ok(true)` when the job stopped because it was cancelled
    async fn crawl_loop(
        &self,
        seed: Url,
        session: Option<&RenderSession>,
        sink: &mut dyn PageSink,
        cancel: &CancellationToken,
        stats: &mut CrawlStats,
    ) -> Result<bool, RippleError> {
        let fetcher = self.build_fetcher(session);
        let gate = PolitenessGate::new(self.client.clone(), &self.config);
        let max_urls = self.config.max_urls;
        let max_depth = self.config.max_depth;

        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::new(seed.clone(), 0));
        let mut produced = 0usize;
        // Final URLs of every page handed to the sink
        let mut landed_urls: HashSet<String> = HashSet::new();

        loop {
            if cancel.is_cancelled() {
                info!("Crawl cancelled with {} URLs queued", frontier.len());
                return Ok(true);
            }

            let remaining = max_urls.saturating_sub(produced);
            if remaining == 0 {
                info!("Reached max_urls ({})", max_urls);
                return Ok(false);
            }

            let batch = frontier.next_batch(self.config.max_concurrent.min(remaining), max_depth);
            if batch.is_empty() {
                info!("Frontier is empty, crawl complete");
                return Ok(false);
            }
            debug!("Dispatching batch of {}", batch.len());

            let results = join_all(
                batch
                    .into_iter()
                    .map(|entry| self.dispatch(&gate, fetcher.as_ref(), entry)),
            )
            .await;

            for result in results {
                let current = match result {
                    Dispatch::Produced {
                        entry,
                        page,
                        issues,
                    } => {
                        let landed = normalize_url(&page.final_url).ok();
                        let landed_key = landed
                            .as_ref()
                            .map_or_else(|| page.final_url.clone(), Url::to_string);
                        if !landed_urls.insert(landed_key) {
                            debug!("Skipped {}: already crawled as {}", entry.url, page.final_url);
                            stats.record_skip();
                            self.publish_progress(stats, &frontier, &entry.url);
                            continue;
                        }
                        if let Some(landed) = &landed {
                            frontier.mark_visited(landed);
                        }

                        sink.accept(&page, &issues)?;
                        produced += 1;
                        stats.record_success(page.load_time_ms, issues.len());

                        // Redirects can leave the site; only on-site pages expand
                        let on_site = landed.as_ref().is_some_and(|url| same_host(url, &seed));
                        if !on_site {
                            debug!("{} left the site via {}", entry.url, page.final_url);
                        }

                        if on_site && produced < max_urls && entry.depth < max_depth {
                            self.enqueue_links(&gate, &mut frontier, &page, entry.depth + 1);
                        }
                        entry.url
                    }
                    Dispatch::Skipped { entry, reason } => {
                        debug!("Skipped {}: {}", entry.url, reason);
                        stats.record_skip();
                        entry.url
                    }
                    Dispatch::Failed { entry, error } => {
                        warn!("Failed {}: {}", entry.url, error);
                        stats.record_failure(error);
                        entry.url
                    }
                };

                self.publish_progress(stats, &frontier, &current);
            }
        }
    }

    fn publish_progress(&self, stats: &CrawlStats, frontier: &Frontier, current: &Url) {
        self.progress.publish(CrawlEvent::Progress(
            stats.snapshot(frontier.len(), Some(current.to_string())),
        ));
    }

    fn build_fetcher(&self, session: Option<&RenderSession>) -> Arc<dyn Fetcher> {
        if let Some(fetcher) = &self.fetcher {
            return Arc::clone(fetcher);
        }

        let mut engine = FetchEngine::new(self.client.clone(), &self.config);
        if let Some(session) = session {
            engine = engine.with_render_stage(RenderStage {
                renderer: session.renderer(),
                mobile: self.config.mobile_analysis_enabled,
                screenshot_dir: self
                    .config
                    .screenshot_enabled
                    .then(|| self.render_config.screenshot_dir.clone()),
            });
        }
        Arc::new(engine)
    }

    async fn dispatch(
        &self,
        gate: &PolitenessGate,
        fetcher: &dyn Fetcher,
        entry: FrontierEntry,
    ) -> Dispatch {
        if gate.excluded(&entry.url) {
            return Dispatch::Skipped {
                entry,
                reason: "excluded by pattern".to_string(),
            };
        }
        if !gate.allowed(&entry.url).await {
            return Dispatch::Skipped {
                entry,
                reason: "disallowed by robots.txt".to_string(),
            };
        }

        match fetcher.fetch(&entry.url).await {
            Ok(FetchOutcome::Page(fetched)) => {
                let page = self.analyzer.analyze(&fetched, entry.depth);
                let issues = self.rules.evaluate(&page, &fetched.body);
                Dispatch::Produced {
                    entry,
                    page: Box::new(page),
                    issues,
                }
            }
            Ok(FetchOutcome::NotHtml { content_type, .. }) => Dispatch::Skipped {
                entry,
                reason: format!("not HTML ({})", content_type),
            },
            Err(e) => Dispatch::Failed {
                entry,
                error: e.to_string(),
            },
        }
    }

    fn enqueue_links(
        &self,
        gate: &PolitenessGate,
        frontier: &mut Frontier,
        page: &PageRecord,
        depth: u32,
    ) {
        let mut added = 0;
        for link in &page.internal_links {
            let url = match normalize_url(&link.url) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Skipping link {}: {}", link.url, e);
                    continue;
                }
            };
            if gate.excluded(&url) {
                continue;
            }
            if frontier.push(FrontierEntry::new(url, depth)) {
                added += 1;
            }
        }
        debug!("Queued {} new URLs from {}", added, page.url);
    }

    fn set_status(&self, status: &mut JobStatus, next: JobStatus, message: Option<String>) {
        match status.transition(next) {
            Ok(new_status) => {
                *status = new_status;
                self.progress.publish_status(new_status, message);
            }
            Err(e) => error!("{}", e),
        }
    }
}
