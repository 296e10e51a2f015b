use crate::rules::{IssueKind, Rule, RuleContext, RuleError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportRule;

impl Rule for ViewportRule {
    fn name(&self) -> &'static str {
        "viewport"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let has_viewport = match &ctx.page.mobile {
            Some(mobile) => mobile.has_viewport,
            None => ctx.page.viewport.is_some(),
        };
        if has_viewport {
            Ok(Vec::new())
        } else {
            Ok(vec![IssueKind::MissingViewport])
        }
    }
}

/// Only evaluated when a mobile rendering was analyzed
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTargetRule;

impl Rule for TouchTargetRule {
    fn name(&self) -> &'static str {
        "touch_targets"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        match &ctx.page.mobile {
            Some(mobile) if mobile.undersized_touch_targets > 0 => {
                Ok(vec![IssueKind::SmallTouchTargets {
                    undersized: mobile.undersized_touch_targets,
                    total: mobile.touch_targets,
                }])
            }
            _ => Ok(Vec::new()),
        }
    }
}
