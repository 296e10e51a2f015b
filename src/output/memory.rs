use crate::analyze::PageRecord;
use crate::crawler::CrawlReport;
use crate::output::{PageSink, SinkResult};
use crate::rules::IssueRecord;
use crate::state::JobStatus;

/// Keeps every accepted page in memory; for tests and dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    pub pages: Vec<(PageRecord, Vec<IssueRecord>)>,
    pub seed: Option<String>,
    pub final_status: Option<JobStatus>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.pages.iter().map(|(page, _)| page.url.as_str()).collect()
    }

    pub fn issue_count(&self) -> usize {
        self.pages.iter().map(|(_, issues)| issues.len()).sum()
    }
}

impl PageSink for MemorySink {
    fn job_started(&mut self, seed: &str) -> SinkResult<()> {
        self.seed = Some(seed.to_string());
        Ok(())
    }

    fn accept(&mut self, page: &PageRecord, issues: &[IssueRecord]) -> SinkResult<()> {
        self.pages.push((page.clone(), issues.to_vec()));
        Ok(())
    }

    fn job_finished(&mut self, report: &CrawlReport) -> SinkResult<()> {
        self.final_status = Some(report.status);
        Ok(())
    }
}
