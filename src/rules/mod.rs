//! Issue Rule Engine
//!
//! Every rule is an independent [`Rule`] that looks at a [`PageRecord`] (and
//! the raw markup) and reports zero or more [`IssueKind`]s. Rules share no
//! state, so their order never changes the result. A rule that fails is
//! logged and skipped; the others still run.
//!
//! The page's [`LanguageStrategy`] supplies the message templates and the
//! language-specific switches (hreflang, og:locale, local business and price
//! schema), so no rule branches on the language itself.

mod accessibility;
mod content;
mod issue;
mod mobile;
mod performance;
mod social;
mod technical;

pub use accessibility::{AltTextRule, FormLabelRule, HtmlLangRule};
pub use content::{MetaDescriptionRule, TitleRule};
pub use issue::{Category, IssueKind, IssueRecord, IssueText, IssueType, Severity};
pub use mobile::{TouchTargetRule, ViewportRule};
pub use performance::{DomSizeRule, ImageOptimizationRule};
pub use social::OpenGraphRule;
pub use technical::{
    CanonicalRule, CharsetRule, HeadingRule, HreflangRule, HttpsRule, RobotsMetaRule,
    StructuredDataRule,
};

use crate::analyze::{rendered_text, LanguageStrategy, PageRecord};
use scraper::Html;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Page URL is not absolute: {0}")]
    InvalidPageUrl(String),

    #[error("{0}")]
    Other(String),
}

/// What a rule gets to look at
pub struct RuleContext<'a> {
    pub page: &'a PageRecord,
    pub raw: &'a str,
    /// Lower-cased rendered text (no markup, scripts or styles), for
    /// mention checks
    pub text: String,
    pub strategy: &'static dyn LanguageStrategy,
}

impl<'a> RuleContext<'a> {
    pub fn new(page: &'a PageRecord, raw: &'a str) -> Self {
        Self {
            page,
            raw,
            text: rendered_text(&Html::parse_document(raw)).to_lowercase(),
            strategy: page.strategy(),
        }
    }
}

pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError>;
}

#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    /// Engine with the full default rule set
    pub fn new() -> Self {
        let rules: Vec<Arc<dyn Rule>> = vec![
            Arc::new(TitleRule),
            Arc::new(MetaDescriptionRule),
            Arc::new(HeadingRule),
            Arc::new(CanonicalRule),
            Arc::new(RobotsMetaRule),
            Arc::new(HttpsRule),
            Arc::new(StructuredDataRule),
            Arc::new(ImageOptimizationRule),
            Arc::new(DomSizeRule),
            Arc::new(AltTextRule),
            Arc::new(FormLabelRule),
            Arc::new(HtmlLangRule),
            Arc::new(HreflangRule),
            Arc::new(CharsetRule),
            Arc::new(OpenGraphRule),
            Arc::new(ViewportRule),
            Arc::new(TouchTargetRule),
        ];
        Self { rules }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn evaluate(&self, page: &PageRecord, raw: &str) -> Vec<IssueRecord> {
        let ctx = RuleContext::new(page, raw);
        let mut issues = Vec::new();

        for rule in &self.rules {
            match rule.evaluate(&ctx) {
                Ok(kinds) => issues.extend(
                    kinds
                        .iter()
                        .map(|kind| IssueRecord::from_kind(kind, ctx.strategy)),
                ),
                Err(e) => warn!("Rule '{}' failed on {}: {}", rule.name(), page.url, e),
            }
        }

        issues
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::analyze::test_support::fetched;
    use crate::analyze::{PageAnalyzer, PageRecord};
    use crate::rules::{IssueKind, Rule, RuleContext};

    pub fn record(url: &str, html: &str) -> PageRecord {
        PageAnalyzer::new().analyze(&fetched(url, html), 0)
    }

    /// Issues one rule reports for `html` served at `url`
    pub fn run(rule: &dyn Rule, url: &str, html: &str) -> Vec<IssueKind> {
        let page = record(url, html);
        rule.evaluate(&RuleContext::new(&page, html)).unwrap()
    }
}
