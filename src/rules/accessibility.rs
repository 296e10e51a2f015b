use crate::analyze::Language;
use crate::rules::{IssueKind, Rule, RuleContext, RuleError};

#[derive(Debug, Clone, Copy, Default)]
pub struct AltTextRule;

impl Rule for AltTextRule {
    fn name(&self) -> &'static str {
        "alt_text"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let count = ctx.page.images.missing_alt;
        if count > 0 {
            Ok(vec![IssueKind::MissingAltText { count }])
        } else {
            Ok(Vec::new())
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormLabelRule;

impl Rule for FormLabelRule {
    fn name(&self) -> &'static str {
        "form_labels"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let count = ctx.page.unlabeled_inputs;
        if count > 0 {
            Ok(vec![IssueKind::InputsWithoutLabels { count }])
        } else {
            Ok(Vec::new())
        }
    }
}

/// `<html lang>` must be present and agree with the detected content language
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLangRule;

impl Rule for HtmlLangRule {
    fn name(&self) -> &'static str {
        "html_lang"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let expected = ctx.strategy.language().code();
        let Some(found) = ctx.page.html_lang.as_deref() else {
            return Ok(vec![IssueKind::MissingHtmlLang { expected }]);
        };

        if Language::from_tag(found) == Some(ctx.strategy.language()) {
            Ok(Vec::new())
        } else {
            Ok(vec![IssueKind::IncorrectHtmlLang {
                found: found.to_string(),
                expected,
            }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    const URL: &str = "https://example.com/";

    #[test]
    fn test_alt_text() {
        let html = r#"<img src="a.jpg"><img src="b.jpg" alt="B"><img src="c.jpg">"#;
        assert_eq!(
            run(&AltTextRule, URL, html),
            vec![IssueKind::MissingAltText { count: 2 }]
        );
    }

    #[test]
    fn test_empty_alt_counts_as_missing() {
        assert_eq!(
            run(&AltTextRule, URL, r#"<img src="a.png" alt="">"#),
            vec![IssueKind::MissingAltText { count: 1 }]
        );
    }

    #[test]
    fn test_form_labels() {
        let html = r#"<form><input type="email" name="e"><label for="n">N</label><input id="n"></form>"#;
        assert_eq!(
            run(&FormLabelRule, URL, html),
            vec![IssueKind::InputsWithoutLabels { count: 1 }]
        );
    }

    #[test]
    fn test_html_lang() {
        let english = "<p>This is the page for our products and their prices.</p>";
        assert_eq!(
            run(&HtmlLangRule, URL, english),
            vec![IssueKind::MissingHtmlLang { expected: "en" }]
        );

        let declared = format!(r#"<html lang="en-GB"><body>{english}</body></html>"#);
        assert!(run(&HtmlLangRule, URL, &declared).is_empty());

        let wrong = format!(r#"<html lang="hu"><body>{english}</body></html>"#);
        assert_eq!(
            run(&HtmlLangRule, URL, &wrong),
            vec![IssueKind::IncorrectHtmlLang {
                found: "hu".to_string(),
                expected: "en"
            }]
        );
    }
}
