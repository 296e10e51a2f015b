//! SEO-Ripple main entry point
//!
//! Command-line interface: crawl one site and store pages and issues in
//! SQLite.

use anyhow::Context;
use clap::Parser;
use seo_ripple::config::{load_config_with_hash, Config};
use seo_ripple::crawler::{join_observer, spawn_observer, CrawlEvent, Crawler};
use seo_ripple::output::SqliteSink;
use seo_ripple::url::normalize_url;
use seo_ripple::JobStatus;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// SEO-Ripple: a polite crawler with on-page SEO analysis
///
/// Crawls a single site within the configured bounds, respecting robots.txt,
/// analyzes every HTML page and records SEO issues.
#[derive(Parser, Debug)]
#[command(name = "seo-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A polite crawler with on-page SEO analysis", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// URL the crawl starts from
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and seed without crawling
    #[arg(long)]
    dry_run: bool,

    /// Override the database path from the config file
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let database = cli
        .database
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.database_path));

    if cli.dry_run {
        return handle_dry_run(&config, &cli.seed, &database);
    }

    handle_crawl(config, &config_hash, &cli.seed, &database).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_ripple=info,warn"),
            1 => EnvFilter::new("seo_ripple=debug,info"),
            2 => EnvFilter::new("seo_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn handle_dry_run(config: &Config, seed: &str, database: &Path) -> anyhow::Result<()> {
    let seed = normalize_url(seed).with_context(|| format!("Invalid seed URL: {}", seed))?;
    let crawl = &config.crawl;

    println!("=== SEO-Ripple Dry Run ===\n");
    println!("Seed: {}", seed);

    println!("\nCrawl:");
    println!("  Max URLs: {}", crawl.max_urls);
    println!("  Max depth: {}", crawl.max_depth);
    println!("  Max concurrent: {}", crawl.max_concurrent);
    println!("  Request delay: {}ms", crawl.request_delay_ms);
    println!("  Timeout: {}s", crawl.timeout_secs);
    println!("  User agent: {}", crawl.user_agent);
    println!("  Respect robots.txt: {}", crawl.respect_robots);
    println!("  Exclude patterns: {:?}", crawl.exclude_patterns);
    println!("  Include patterns: {:?}", crawl.include_patterns);

    println!("\nRendering:");
    if crawl.render_enabled {
        println!("  Endpoint: {}", config.render.endpoint);
        println!("  Mobile analysis: {}", crawl.mobile_analysis_enabled);
        println!("  Screenshots: {}", crawl.screenshot_enabled);
    } else {
        println!("  Disabled");
    }

    println!("\nOutput:");
    println!("  Database: {}", database.display());

    println!("\n✓ Configuration is valid");
    Ok(())
}

async fn handle_crawl(
    config: Config,
    config_hash: &str,
    seed: &str,
    database: &Path,
) -> anyhow::Result<()> {
    let mut sink = SqliteSink::new(database, config_hash)
        .with_context(|| format!("Failed to open database {}", database.display()))?;

    let crawler = Crawler::new(config.crawl.clone())?.with_render_config(config.render.clone());

    let observer = spawn_observer(crawler.progress().subscribe(), |event| {
        if let CrawlEvent::Progress(snapshot) = event {
            if snapshot.pages_crawled > 0 && snapshot.pages_crawled % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages, {} failed, {} queued, {:.0}ms avg, {} issues",
                    snapshot.pages_crawled,
                    snapshot.failed,
                    snapshot.queue_size,
                    snapshot.avg_load_time,
                    snapshot.total_issues
                );
            }
        }
        Ok(())
    });

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current batch");
            on_interrupt.cancel();
        }
    });

    let report = crawler.run(seed, &mut sink, cancel).await;
    drop(crawler);
    join_observer(observer).await;

    println!(
        "Crawl {} in {:.1}s: {} pages, {} failed, {} skipped, {} issues",
        report.status,
        report.elapsed.as_secs_f64(),
        report.stats.successful,
        report.stats.failed,
        report.stats.skipped,
        report.stats.total_issues
    );

    match report.status {
        JobStatus::Failed => Err(anyhow::anyhow!(report
            .error
            .unwrap_or_else(|| "crawl failed".to_string()))),
        _ => Ok(()),
    }
}
