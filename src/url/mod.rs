//! URL handling module for SEO-Ripple
//!
//! Normalization (the crawl's identity key), origin keys for the robots
//! cache, host comparison for internal-link classification, and the
//! include/exclude substring filter.

mod filter;
mod normalize;

use url::Url;

pub use filter::PatternFilter;
pub use normalize::{normalize_parsed, normalize_url};

/// `scheme://host[:port]` of a URL, the key of per-origin state
///
/// ```
/// use seo_ripple::url::origin_key;
/// use url::Url;
///
/// let url = Url::parse("https://example.com:8443/a?b=c").unwrap();
/// assert_eq!(origin_key(&url), "https://example.com:8443");
/// ```
pub fn origin_key(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// True when both URLs point at the same host (case-insensitive)
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        _ => false,
    }
}
