use crate::analyze::{charset_param, StructuredFormat};
use crate::rules::{IssueKind, Rule, RuleContext, RuleError};
use url::Url;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingRule;

impl Rule for HeadingRule {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let headings = &ctx.page.headings;
        let mut issues = Vec::new();

        match headings.h1.len() {
            0 => issues.push(IssueKind::MissingH1),
            1 => {}
            count => issues.push(IssueKind::MultipleH1 { count }),
        }
        if let Some((from, to)) = headings.first_skip() {
            issues.push(IssueKind::SkippedHeadingLevel { from, to });
        }

        Ok(issues)
    }
}

/// A canonical pointing at the page itself (trailing slash ignored) is fine
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalRule;

impl Rule for CanonicalRule {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let href = match ctx.page.canonical.as_deref() {
            Some(href) if !href.is_empty() => href,
            _ => return Ok(vec![IssueKind::MissingCanonical]),
        };

        let page = Url::parse(&ctx.page.final_url)
            .map_err(|_| RuleError::InvalidPageUrl(ctx.page.final_url.clone()))?;
        let canonical = page
            .join(href)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string());

        if comparable(&canonical) == comparable(page.as_str()) {
            Ok(Vec::new())
        } else {
            Ok(vec![IssueKind::NonSelfCanonical {
                canonical,
                page: page.to_string(),
            }])
        }
    }
}

fn comparable(url: &str) -> &str {
    let url = url.split('#').next().unwrap_or(url);
    url.strip_suffix('/').unwrap_or(url)
}

/// Meta robots and `X-Robots-Tag` directives
#[derive(Debug, Clone, Copy, Default)]
pub struct RobotsMetaRule;

impl Rule for RobotsMetaRule {
    fn name(&self) -> &'static str {
        "robots_meta"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let directives: Vec<&str> = ctx
            .page
            .robots_directives
            .iter()
            .chain(ctx.page.headers.get("x-robots-tag"))
            .map(String::as_str)
            .collect();
        if directives.is_empty() {
            return Ok(Vec::new());
        }

        let joined = directives.join(", ");
        let tokens: Vec<String> = joined
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .collect();
        let has = |name: &str| tokens.iter().any(|t| t == name || t == "none");

        let mut issues = Vec::new();
        if has("noindex") {
            issues.push(IssueKind::NoindexFound {
                directives: joined.clone(),
            });
        }
        if has("nofollow") {
            issues.push(IssueKind::NofollowFound { directives: joined });
        }
        Ok(issues)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HttpsRule;

impl Rule for HttpsRule {
    fn name(&self) -> &'static str {
        "https"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let page = Url::parse(&ctx.page.final_url)
            .map_err(|_| RuleError::InvalidPageUrl(ctx.page.final_url.clone()))?;
        if page.scheme() == "https" {
            Ok(Vec::new())
        } else {
            Ok(vec![IssueKind::NotHttps {
                scheme: page.scheme().to_string(),
            }])
        }
    }
}

/// Schema presence, plus the local business and price checks the language
/// strategy switches on
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDataRule;

const LOCAL_BUSINESS_TYPES: &[&str] = &["LocalBusiness", "Organization", "Store", "Restaurant"];
const PRICE_TYPES: &[&str] = &["Product", "Offer", "AggregateOffer", "PriceSpecification"];

impl Rule for StructuredDataRule {
    fn name(&self) -> &'static str {
        "structured_data"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let blocks: Vec<_> = ctx
            .page
            .structured_data
            .iter()
            .filter(|block| block.valid)
            .collect();
        let has_any = |types: &[&str]| {
            blocks
                .iter()
                .any(|block| types.iter().any(|t| block.has_type(t)))
        };

        let mut issues = Vec::new();
        if blocks.is_empty() {
            issues.push(IssueKind::MissingSchema);
        }
        // Only pages that already publish JSON-LD are asked for a business type
        let has_json_ld = ctx
            .page
            .structured_data
            .iter()
            .any(|block| block.format == StructuredFormat::JsonLd);
        if let Some(place) = ctx.strategy.local_place_mention(&ctx.text) {
            if has_json_ld && !has_any(LOCAL_BUSINESS_TYPES) {
                issues.push(IssueKind::MissingLocalBusinessSchema {
                    place: place.to_string(),
                });
            }
        }
        if ctx.strategy.mentions_price(&ctx.text) && !has_any(PRICE_TYPES) {
            issues.push(IssueKind::MissingPriceSchema);
        }
        Ok(issues)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HreflangRule;

impl Rule for HreflangRule {
    fn name(&self) -> &'static str {
        "hreflang"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        if ctx.strategy.expects_hreflang() && ctx.page.hreflang.is_empty() {
            Ok(vec![IssueKind::MissingHreflang])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Declared document charset and the `Content-Type` header charset
#[derive(Debug, Clone, Copy, Default)]
pub struct CharsetRule;

impl Rule for CharsetRule {
    fn name(&self) -> &'static str {
        "charset"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let mut issues = Vec::new();

        if let Some(charset) = ctx.page.charset.as_deref() {
            if !is_utf8(charset) {
                issues.push(IssueKind::NonUtf8Charset {
                    charset: charset.to_string(),
                });
            }
        }
        if let Some(charset) = charset_param(&ctx.page.content_type) {
            if !is_utf8(&charset) {
                issues.push(IssueKind::NonUtf8ContentType {
                    content_type: ctx.page.content_type.clone(),
                });
            }
        }

        Ok(issues)
    }
}

fn is_utf8(charset: &str) -> bool {
    matches!(charset.trim().to_ascii_lowercase().as_str(), "utf-8" | "utf8")
}
