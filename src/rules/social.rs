use crate::rules::{IssueKind, Rule, RuleContext, RuleError};

/// Open Graph tags; `og:locale` only when the language strategy expects one
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGraphRule;

impl Rule for OpenGraphRule {
    fn name(&self) -> &'static str {
        "open_graph"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let tag = |key: &str| {
            ctx.page
                .social_tags
                .get(key)
                .map(String::as_str)
                .filter(|v| !v.is_empty())
        };

        let mut issues = Vec::new();
        if tag("og:title").is_none() {
            issues.push(IssueKind::MissingOgTitle);
        }
        if tag("og:description").is_none() {
            issues.push(IssueKind::MissingOgDescription);
        }
        if tag("og:image").is_none() {
            issues.push(IssueKind::MissingOgImage);
        }

        if let Some(expected) = ctx.strategy.expected_og_locale() {
            match tag("og:locale") {
                None => issues.push(IssueKind::MissingOgLocale { expected }),
                Some(found) if !found.eq_ignore_ascii_case(expected) => {
                    issues.push(IssueKind::IncorrectOgLocale {
                        found: found.to_string(),
                        expected,
                    })
                }
                Some(_) => {}
            }
        }

        Ok(issues)
    }
}
