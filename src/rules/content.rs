use crate::rules::{IssueKind, Rule, RuleContext, RuleError};

const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
const DESCRIPTION_MIN: usize = 120;
const DESCRIPTION_MAX: usize = 160;

#[derive(Debug, Clone, Copy, Default)]
pub struct TitleRule;

impl Rule for TitleRule {
    fn name(&self) -> &'static str {
        "title"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let issue = match ctx.page.title.as_deref() {
            None => Some(IssueKind::MissingTitle),
            Some("") => Some(IssueKind::EmptyTitle),
            Some(title) => {
                let length = title.chars().count();
                if length < TITLE_MIN {
                    Some(IssueKind::ShortTitle { length })
                } else if length > TITLE_MAX {
                    Some(IssueKind::LongTitle { length })
                } else {
                    None
                }
            }
        };
        Ok(issue.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetaDescriptionRule;

impl Rule for MetaDescriptionRule {
    fn name(&self) -> &'static str {
        "meta_description"
    }

    fn evaluate(&self, ctx: &RuleContext) -> Result<Vec<IssueKind>, RuleError> {
        let issue = match ctx.page.meta_description.as_deref() {
            None => Some(IssueKind::MissingMetaDescription),
            Some("") => Some(IssueKind::EmptyMetaDescription),
            Some(description) => {
                let length = description.chars().count();
                if length < DESCRIPTION_MIN {
                    Some(IssueKind::ShortMetaDescription { length })
                } else if length > DESCRIPTION_MAX {
                    Some(IssueKind::LongMetaDescription { length })
                } else {
                    None
                }
            }
        };
        Ok(issue.into_iter().collect())
    }
}
