//! SQLite persistence of crawl jobs, pages and issues

use crate::analyze::PageRecord;
use crate::crawler::CrawlReport;
use crate::output::schema::initialize_schema;
use crate::output::{PageSink, SinkResult};
use crate::rules::IssueRecord;
use crate::state::JobStatus;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

/// SQLite-backed [`PageSink`]
///
/// Each job gets a `crawl_jobs` row when it starts; pages and their issues
/// are written in one transaction per page.
pub struct SqliteSink {
    conn: Connection,
    config_hash: String,
    job_id: Option<i64>,
}

impl SqliteSink {
    pub fn new(path: &Path, config_hash: &str) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            config_hash: config_hash.to_string(),
            job_id: None,
        })
    }

    pub fn new_in_memory(config_hash: &str) -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            config_hash: config_hash.to_string(),
            job_id: None,
        })
    }

    pub fn job_id(&self) -> Option<i64> {
        self.job_id
    }

    /// Creates the job row on first use
    fn ensure_job(&mut self, seed: &str) -> SinkResult<i64> {
        if let Some(id) = self.job_id {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO crawl_jobs (seed_url, config_hash, status, started_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                seed,
                self.config_hash,
                JobStatus::Running.to_db_string(),
                Utc::now().to_rfc3339()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.job_id = Some(id);
        Ok(id)
    }

    pub fn job_status(&self, job_id: i64) -> SinkResult<Option<JobStatus>> {
        let status: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM crawl_jobs WHERE id = ?1",
                params![job_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(status.and_then(|s| JobStatus::from_db_string(&s)))
    }

    pub fn count_pages(&self) -> SinkResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn count_issues(&self) -> SinkResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM issues", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// URLs sharing a content fingerprint, for duplicate-content reports
    pub fn duplicate_content(&self) -> SinkResult<Vec<(String, Vec<String>)>> {
        let mut stmt = self.conn.prepare(
            "SELECT content_hash, url FROM pages
             WHERE content_hash IN (
                 SELECT content_hash FROM pages GROUP BY content_hash HAVING COUNT(*) > 1
             )
             ORDER BY content_hash, url",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for row in rows {
            let (hash, url) = row?;
            match groups.last_mut() {
                Some((last, urls)) if *last == hash => urls.push(url),
                _ => groups.push((hash, vec![url])),
            }
        }
        Ok(groups)
    }
}

impl PageSink for SqliteSink {
    fn job_started(&mut self, seed: &str) -> SinkResult<()> {
        let id = self.ensure_job(seed)?;
        debug!("Recording crawl job {}", id);
        Ok(())
    }

    fn accept(&mut self, page: &PageRecord, issues: &[IssueRecord]) -> SinkResult<()> {
        let job_id = self.ensure_job(&page.url)?;
        let record_json = serde_json::to_string(page)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO pages (job_id, url, final_url, status_code, depth, title,
                 meta_description, language, word_count, readability_score,
                 load_time_ms, content_hash, crawled_at, record_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                job_id,
                page.url,
                page.final_url,
                page.status_code,
                page.depth,
                page.title,
                page.meta_description,
                page.language.code(),
                page.text.word_count as i64,
                page.readability.score,
                page.load_time_ms as i64,
                page.content_hash,
                Utc::now().to_rfc3339(),
                record_json,
            ],
        )?;
        let page_id = tx.last_insert_rowid();

        for issue in issues {
            tx.execute(
                "INSERT INTO issues (page_id, job_id, issue_type, severity, category,
                     impact_score, description, recommendation, element,
                     current_value, suggested_value)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    page_id,
                    job_id,
                    issue.issue_type.as_str(),
                    issue.severity.as_str(),
                    issue.category.as_str(),
                    issue.impact_score,
                    issue.description,
                    issue.recommendation,
                    issue.element,
                    issue.current_value,
                    issue.suggested_value,
                ],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    fn job_finished(&mut self, report: &CrawlReport) -> SinkResult<()> {
        let Some(job_id) = self.job_id else {
            return Ok(());
        };
        self.conn.execute(
            "UPDATE crawl_jobs SET status = ?1, completed_at = ?2, error_message = ?3,
                 pages_crawled = ?4, pages_failed = ?5, pages_skipped = ?6, total_issues = ?7
             WHERE id = ?8",
            params![
                report.status.to_db_string(),
                Utc::now().to_rfc3339(),
                report.error,
                report.stats.successful as i64,
                report.stats.failed as i64,
                report.stats.skipped as i64,
                report.stats.total_issues as i64,
                job_id
            ],
        )?;
        Ok(())
    }
}
