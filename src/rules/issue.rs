//! Closed issue vocabulary
//!
//! Every finding is an [`IssueKind`] carrying the values the rule measured.
//! Severity, category and impact score are total functions of its
//! [`IssueType`], so adding a variant forces every mapping to be updated.

use crate::analyze::LanguageStrategy;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technical,
    Content,
    Performance,
    Accessibility,
    Social,
    Security,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Content => "content",
            Self::Performance => "performance",
            Self::Accessibility => "accessibility",
            Self::Social => "social",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue type identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingTitle,
    EmptyTitle,
    ShortTitle,
    LongTitle,
    MissingMetaDescription,
    EmptyMetaDescription,
    ShortMetaDescription,
    LongMetaDescription,
    MissingH1,
    MultipleH1,
    SkippedHeadingLevel,
    MissingCanonical,
    NonSelfCanonical,
    NoindexFound,
    NofollowFound,
    NotHttps,
    MissingSchema,
    MissingLocalBusinessSchema,
    MissingPriceSchema,
    UnoptimizedImages,
    LargeDom,
    MissingAltText,
    InputsWithoutLabels,
    MissingHtmlLang,
    IncorrectHtmlLang,
    MissingHreflang,
    NonUtf8Charset,
    NonUtf8ContentType,
    MissingOgTitle,
    MissingOgDescription,
    MissingOgImage,
    MissingOgLocale,
    IncorrectOgLocale,
    MissingViewport,
    SmallTouchTargets,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingTitle => "missing_title",
            Self::EmptyTitle => "empty_title",
            Self::ShortTitle => "short_title",
            Self::LongTitle => "long_title",
            Self::MissingMetaDescription => "missing_meta_description",
            Self::EmptyMetaDescription => "empty_meta_description",
            Self::ShortMetaDescription => "short_meta_description",
            Self::LongMetaDescription => "long_meta_description",
            Self::MissingH1 => "missing_h1",
            Self::MultipleH1 => "multiple_h1",
            Self::SkippedHeadingLevel => "skipped_heading_level",
            Self::MissingCanonical => "missing_canonical",
            Self::NonSelfCanonical => "non_self_canonical",
            Self::NoindexFound => "noindex_found",
            Self::NofollowFound => "nofollow_found",
            Self::NotHttps => "not_https",
            Self::MissingSchema => "missing_schema",
            Self::MissingLocalBusinessSchema => "missing_local_business_schema",
            Self::MissingPriceSchema => "missing_price_schema",
            Self::UnoptimizedImages => "unoptimized_images",
            Self::LargeDom => "large_dom",
            Self::MissingAltText => "missing_alt_text",
            Self::InputsWithoutLabels => "inputs_without_labels",
            Self::MissingHtmlLang => "missing_html_lang",
            Self::IncorrectHtmlLang => "incorrect_html_lang",
            Self::MissingHreflang => "missing_hreflang",
            Self::NonUtf8Charset => "non_utf8_charset",
            Self::NonUtf8ContentType => "non_utf8_content_type",
            Self::MissingOgTitle => "missing_og_title",
            Self::MissingOgDescription => "missing_og_description",
            Self::MissingOgImage => "missing_og_image",
            Self::MissingOgLocale => "missing_og_locale",
            Self::IncorrectOgLocale => "incorrect_og_locale",
            Self::MissingViewport => "missing_viewport",
            Self::SmallTouchTargets => "small_touch_targets",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingTitle | Self::EmptyTitle | Self::NoindexFound => Severity::Critical,

            Self::MissingMetaDescription
            | Self::EmptyMetaDescription
            | Self::MissingH1
            | Self::NotHttps
            | Self::NonUtf8Charset
            | Self::NonUtf8ContentType
            | Self::MissingViewport => Severity::High,

            Self::ShortTitle
            | Self::LongTitle
            | Self::LongMetaDescription
            | Self::MultipleH1
            | Self::MissingCanonical
            | Self::NofollowFound
            | Self::UnoptimizedImages
            | Self::LargeDom
            | Self::MissingAltText
            | Self::InputsWithoutLabels
            | Self::MissingHtmlLang
            | Self::IncorrectHtmlLang => Severity::Medium,

            Self::ShortMetaDescription
            | Self::SkippedHeadingLevel
            | Self::NonSelfCanonical
            | Self::MissingSchema
            | Self::MissingLocalBusinessSchema
            | Self::MissingPriceSchema
            | Self::MissingHreflang
            | Self::MissingOgTitle
            | Self::MissingOgDescription
            | Self::MissingOgImage
            | Self::MissingOgLocale
            | Self::IncorrectOgLocale
            | Self::SmallTouchTargets => Severity::Low,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::MissingTitle
            | Self::EmptyTitle
            | Self::MissingH1
            | Self::MultipleH1
            | Self::MissingCanonical
            | Self::NonSelfCanonical
            | Self::NoindexFound
            | Self::NofollowFound
            | Self::MissingSchema
            | Self::MissingLocalBusinessSchema
            | Self::MissingPriceSchema
            | Self::MissingHreflang
            | Self::NonUtf8Charset
            | Self::NonUtf8ContentType
            | Self::MissingViewport => Category::Technical,

            Self::ShortTitle
            | Self::LongTitle
            | Self::MissingMetaDescription
            | Self::EmptyMetaDescription
            | Self::ShortMetaDescription
            | Self::LongMetaDescription => Category::Content,

            Self::UnoptimizedImages | Self::LargeDom => Category::Performance,

            Self::SkippedHeadingLevel
            | Self::MissingAltText
            | Self::InputsWithoutLabels
            | Self::MissingHtmlLang
            | Self::IncorrectHtmlLang
            | Self::SmallTouchTargets => Category::Accessibility,

            Self::MissingOgTitle
            | Self::MissingOgDescription
            | Self::MissingOgImage
            | Self::MissingOgLocale
            | Self::IncorrectOgLocale => Category::Social,

            Self::NotHttps => Category::Security,
        }
    }

    /// SEO weight, 0-100
    pub fn impact_score(&self) -> u8 {
        match self {
            Self::NoindexFound => 100,
            Self::MissingTitle | Self::EmptyTitle => 95,
            Self::NotHttps => 90,
            Self::MissingH1 => 85,
            Self::MissingMetaDescription | Self::EmptyMetaDescription => 80,
            Self::NonUtf8Charset | Self::NonUtf8ContentType => 75,
            Self::MissingViewport => 70,
            Self::ShortTitle | Self::MissingCanonical => 60,
            Self::LongTitle | Self::MultipleH1 | Self::MissingAltText => 50,
            Self::UnoptimizedImages | Self::InputsWithoutLabels | Self::MissingHtmlLang => 45,
            Self::LongMetaDescription
            | Self::NofollowFound
            | Self::LargeDom
            | Self::IncorrectHtmlLang => 40,
            Self::MissingSchema | Self::MissingLocalBusinessSchema => 35,
            Self::ShortMetaDescription
            | Self::NonSelfCanonical
            | Self::MissingPriceSchema
            | Self::SmallTouchTargets => 30,
            Self::SkippedHeadingLevel | Self::MissingHreflang => 25,
            Self::MissingOgTitle | Self::MissingOgDescription => 20,
            Self::MissingOgImage | Self::MissingOgLocale | Self::IncorrectOgLocale => 15,
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding together with the values that triggered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingTitle,
    EmptyTitle,
    ShortTitle { length: usize },
    LongTitle { length: usize },
    MissingMetaDescription,
    EmptyMetaDescription,
    ShortMetaDescription { length: usize },
    LongMetaDescription { length: usize },
    MissingH1,
    MultipleH1 { count: usize },
    SkippedHeadingLevel { from: u8, to: u8 },
    MissingCanonical,
    NonSelfCanonical { canonical: String, page: String },
    NoindexFound { directives: String },
    NofollowFound { directives: String },
    NotHttps { scheme: String },
    MissingSchema,
    MissingLocalBusinessSchema { place: String },
    MissingPriceSchema,
    UnoptimizedImages { count: usize },
    LargeDom { elements: usize },
    MissingAltText { count: usize },
    InputsWithoutLabels { count: usize },
    MissingHtmlLang { expected: &'static str },
    IncorrectHtmlLang { found: String, expected: &'static str },
    MissingHreflang,
    NonUtf8Charset { charset: String },
    NonUtf8ContentType { content_type: String },
    MissingOgTitle,
    MissingOgDescription,
    MissingOgImage,
    MissingOgLocale { expected: &'static str },
    IncorrectOgLocale { found: String, expected: &'static str },
    MissingViewport,
    SmallTouchTargets { undersized: usize, total: usize },
}

impl IssueKind {
    pub fn issue_type(&self) -> IssueType {
        match self {
            Self::MissingTitle => IssueType::MissingTitle,
            Self::EmptyTitle => IssueType::EmptyTitle,
            Self::ShortTitle { .. } => IssueType::ShortTitle,
            Self::LongTitle { .. } => IssueType::LongTitle,
            Self::MissingMetaDescription => IssueType::MissingMetaDescription,
            Self::EmptyMetaDescription => IssueType::EmptyMetaDescription,
            Self::ShortMetaDescription { .. } => IssueType::ShortMetaDescription,
            Self::LongMetaDescription { .. } => IssueType::LongMetaDescription,
            Self::MissingH1 => IssueType::MissingH1,
            Self::MultipleH1 { .. } => IssueType::MultipleH1,
            Self::SkippedHeadingLevel { .. } => IssueType::SkippedHeadingLevel,
            Self::MissingCanonical => IssueType::MissingCanonical,
            Self::NonSelfCanonical { .. } => IssueType::NonSelfCanonical,
            Self::NoindexFound { .. } => IssueType::NoindexFound,
            Self::NofollowFound { .. } => IssueType::NofollowFound,
            Self::NotHttps { .. } => IssueType::NotHttps,
            Self::MissingSchema => IssueType::MissingSchema,
            Self::MissingLocalBusinessSchema { .. } => IssueType::MissingLocalBusinessSchema,
            Self::MissingPriceSchema => IssueType::MissingPriceSchema,
            Self::UnoptimizedImages { .. } => IssueType::UnoptimizedImages,
            Self::LargeDom { .. } => IssueType::LargeDom,
            Self::MissingAltText { .. } => IssueType::MissingAltText,
            Self::InputsWithoutLabels { .. } => IssueType::InputsWithoutLabels,
            Self::MissingHtmlLang { .. } => IssueType::MissingHtmlLang,
            Self::IncorrectHtmlLang { .. } => IssueType::IncorrectHtmlLang,
            Self::MissingHreflang => IssueType::MissingHreflang,
            Self::NonUtf8Charset { .. } => IssueType::NonUtf8Charset,
            Self::NonUtf8ContentType { .. } => IssueType::NonUtf8ContentType,
            Self::MissingOgTitle => IssueType::MissingOgTitle,
            Self::MissingOgDescription => IssueType::MissingOgDescription,
            Self::MissingOgImage => IssueType::MissingOgImage,
            Self::MissingOgLocale { .. } => IssueType::MissingOgLocale,
            Self::IncorrectOgLocale { .. } => IssueType::IncorrectOgLocale,
            Self::MissingViewport => IssueType::MissingViewport,
            Self::SmallTouchTargets { .. } => IssueType::SmallTouchTargets,
        }
    }

    /// CSS selector of the element the finding is about
    pub fn element(&self) -> Option<&'static str> {
        match self {
            Self::MissingTitle
            | Self::EmptyTitle
            | Self::ShortTitle { .. }
            | Self::LongTitle { .. } => Some("title"),
            Self::MissingMetaDescription
            | Self::EmptyMetaDescription
            | Self::ShortMetaDescription { .. }
            | Self::LongMetaDescription { .. } => Some("meta[name=\"description\"]"),
            Self::MissingH1 | Self::MultipleH1 { .. } => Some("h1"),
            Self::MissingCanonical | Self::NonSelfCanonical { .. } => {
                Some("link[rel=\"canonical\"]")
            }
            Self::NoindexFound { .. } | Self::NofollowFound { .. } => {
                Some("meta[name=\"robots\"]")
            }
            Self::MissingSchema
            | Self::MissingLocalBusinessSchema { .. }
            | Self::MissingPriceSchema => Some("script[type=\"application/ld+json\"]"),
            Self::UnoptimizedImages { .. } | Self::MissingAltText { .. } => Some("img"),
            Self::InputsWithoutLabels { .. } => Some("input"),
            Self::MissingHtmlLang { .. } | Self::IncorrectHtmlLang { .. } => Some("html"),
            Self::MissingHreflang => Some("link[rel=\"alternate\"][hreflang]"),
            Self::NonUtf8Charset { .. } => Some("meta[charset]"),
            Self::MissingOgTitle => Some("meta[property=\"og:title\"]"),
            Self::MissingOgDescription => Some("meta[property=\"og:description\"]"),
            Self::MissingOgImage => Some("meta[property=\"og:image\"]"),
            Self::MissingOgLocale { .. } | Self::IncorrectOgLocale { .. } => {
                Some("meta[property=\"og:locale\"]")
            }
            Self::MissingViewport => Some("meta[name=\"viewport\"]"),
            Self::SkippedHeadingLevel { .. }
            | Self::NotHttps { .. }
            | Self::LargeDom { .. }
            | Self::NonUtf8ContentType { .. }
            | Self::SmallTouchTargets { .. } => None,
        }
    }

    pub fn current_value(&self) -> Option<String> {
        match self {
            Self::ShortTitle { length }
            | Self::LongTitle { length }
            | Self::ShortMetaDescription { length }
            | Self::LongMetaDescription { length } => Some(length.to_string()),
            Self::MultipleH1 { count }
            | Self::UnoptimizedImages { count }
            | Self::MissingAltText { count }
            | Self::InputsWithoutLabels { count } => Some(count.to_string()),
            Self::SkippedHeadingLevel { from, to } => Some(format!("h{} -> h{}", from, to)),
            Self::NonSelfCanonical { canonical, .. } => Some(canonical.clone()),
            Self::NoindexFound { directives } | Self::NofollowFound { directives } => {
                Some(directives.clone())
            }
            Self::NotHttps { scheme } => Some(scheme.clone()),
            Self::MissingLocalBusinessSchema { place } => Some(place.clone()),
            Self::LargeDom { elements } => Some(elements.to_string()),
            Self::IncorrectHtmlLang { found, .. } | Self::IncorrectOgLocale { found, .. } => {
                Some(found.clone())
            }
            Self::NonUtf8Charset { charset } => Some(charset.clone()),
            Self::NonUtf8ContentType { content_type } => Some(content_type.clone()),
            Self::SmallTouchTargets { undersized, total } => {
                Some(format!("{}/{}", undersized, total))
            }
            _ => None,
        }
    }

    pub fn suggested_value(&self) -> Option<String> {
        match self {
            Self::MissingTitle | Self::EmptyTitle | Self::ShortTitle { .. } => {
                Some("30-60".to_string())
            }
            Self::LongTitle { .. } => Some("60".to_string()),
            Self::MissingMetaDescription
            | Self::EmptyMetaDescription
            | Self::ShortMetaDescription { .. } => Some("120-160".to_string()),
            Self::LongMetaDescription { .. } => Some("160".to_string()),
            Self::MultipleH1 { .. } => Some("1".to_string()),
            Self::NonSelfCanonical { page, .. } => Some(page.clone()),
            Self::NotHttps { .. } => Some("https".to_string()),
            Self::MissingHtmlLang { expected } | Self::IncorrectHtmlLang { expected, .. } => {
                Some(expected.to_string())
            }
            Self::MissingOgLocale { expected } | Self::IncorrectOgLocale { expected, .. } => {
                Some(expected.to_string())
            }
            Self::NonUtf8Charset { .. } => Some("utf-8".to_string()),
            Self::NonUtf8ContentType { .. } => Some("text/html; charset=utf-8".to_string()),
            Self::MissingViewport => Some("width=device-width, initial-scale=1".to_string()),
            Self::SmallTouchTargets { .. } => Some("48x48".to_string()),
            _ => None,
        }
    }
}

/// Localized description and recommendation for a finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueText {
    pub description: String,
    pub recommendation: String,
}

impl IssueText {
    pub fn new(description: impl Into<String>, recommendation: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            recommendation: recommendation.into(),
        }
    }
}

/// One rule-engine finding about a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    pub issue_type: IssueType,
    pub severity: Severity,
    pub category: Category,
    pub description: String,
    pub recommendation: String,
    pub impact_score: u8,
    pub element: Option<String>,
    pub current_value: Option<String>,
    pub suggested_value: Option<String>,
}

impl IssueRecord {
    pub fn from_kind(kind: &IssueKind, strategy: &dyn LanguageStrategy) -> Self {
        let issue_type = kind.issue_type();
        let text = strategy.describe(kind);

        Self {
            issue_type,
            severity: issue_type.severity(),
            category: issue_type.category(),
            description: text.description,
            recommendation: text.recommendation,
            impact_score: issue_type.impact_score(),
            element: kind.element().map(str::to_string),
            current_value: kind.current_value(),
            suggested_value: kind.suggested_value(),
        }
    }
}
