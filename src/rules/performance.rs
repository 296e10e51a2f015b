use crate::rules::{IssueKind, Rule, RuleContext, RuleError};

/// Element count above which the DOM is considered too large
pub const MAX_DOM_ELEMENTS: usize = 1500;

/// Images with no dimensions and no `srcset`
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageOptimizationRule;

impl Rule for ImageOptimizationRule {
    fn name(&self) -> &'static str {
        "image_optimization"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let count = ctx.page.images.unsized_images;
        if count > 0 {
            Ok(vec![IssueKind::UnoptimizedImages { count }])
        } else {
            Ok(Vec::new())
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DomSizeRule;

impl Rule for DomSizeRule {
    fn name(&self) -> &'static str {
        "dom_size"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let elements = ctx.page.dom_element_count;
        if elements > MAX_DOM_ELEMENTS {
            Ok(vec![IssueKind::LargeDom { elements }])
        } else {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    const URL: &str = "https://example.com/";

    #[test]
    fn test_unoptimized_images() {
        let html = r#"<img src="a.jpg" width="1" height="1"><img src="b.jpg">
            <img src="c.jpg" width="5"><img src="d.jpg" width="" height=""><img src="e.jpg" srcset="e2.jpg 2x">"#;
        assert_eq!(
            run(&ImageOptimizationRule, URL, html),
            vec![IssueKind::UnoptimizedImages { count: 2 }]
        );
        assert!(run(&ImageOptimizationRule, URL, "<p>no images</p>").is_empty());
    }

    #[test]
    fn test_large_dom() {
        // html, head, body plus the divs
        let small = format!("<html><body>{}</body></html>", "<div></div>".repeat(1497));
        assert!(run(&DomSizeRule, URL, &small).is_empty());

        let large = format!("<html><body>{}</body></html>", "<div></div>".repeat(1498));
        assert_eq!(
            run(&DomSizeRule, URL, &large),
            vec![IssueKind::LargeDom { elements: 1501 }]
        );
    }
}
