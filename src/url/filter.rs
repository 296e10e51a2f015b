use url::Url;

/// Include/exclude substring filter applied to candidate URLs
///
/// A URL is excluded when it contains any exclude pattern, or when include
/// patterns are configured and it contains none of them.
///
/// # Examples
///
/// ```
/// use seo_ripple::url::PatternFilter;
/// use url::Url;
///
/// let filter = PatternFilter::new(vec!["/admin".into()], vec!["/blog".into()]);
///
/// assert!(!filter.excluded(&Url::parse("https://example.com/blog/post").unwrap()));
/// assert!(filter.excluded(&Url::parse("https://example.com/blog/admin").unwrap()));
/// assert!(filter.excluded(&Url::parse("https://example.com/shop").unwrap()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    exclude: Vec<String>,
    include: Vec<String>,
}

impl PatternFilter {
    pub fn new(exclude: Vec<String>, include: Vec<String>) -> Self {
        Self { exclude, include }
    }

    pub fn excluded(&self, url: &Url) -> bool {
        let candidate = url.as_str();

        if self.exclude.iter().any(|p| candidate.contains(p.as_str())) {
            return true;
        }

        !self.include.is_empty() && !self.include.iter().any(|p| candidate.contains(p.as_str()))
    }
}
