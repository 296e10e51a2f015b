//! Link extraction and internal/external classification

use crate::url::same_host;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// Ancestors that mark a link as site chrome rather than content
const NAVIGATION_ELEMENTS: &[&str] = &["nav", "header", "footer"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Absolute, fragment-free
    pub url: String,
    pub text: String,
    pub rel: Vec<String>,
    pub in_navigation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub internal: Vec<Link>,
    pub external: Vec<Link>,
}

/// Extract every followable anchor from a document
///
/// Relative hrefs are resolved against `<base href>` when present, otherwise
/// against `page_url` (where the document was served from). A link is
/// internal when it shares the host of `site_url`, the URL that was
/// requested. A target appears at most once per list; the first occurrence
/// wins.
pub fn extract_links(document: &Html, page_url: &Url, site_url: &Url) -> PageLinks {
    let base = base_url(document, page_url);
    let mut links = PageLinks::default();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let mut seen_internal = HashSet::new();
    let mut seen_external = HashSet::new();

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(target) = resolve_link(href, &base) else {
            continue;
        };

        let link = Link {
            url: target.to_string(),
            text: anchor
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
            rel: anchor
                .value()
                .attr("rel")
                .map(|rel| rel.split_whitespace().map(str::to_lowercase).collect())
                .unwrap_or_default(),
            in_navigation: in_navigation(anchor),
        };

        if same_host(&target, site_url) {
            if seen_internal.insert(link.url.clone()) {
                links.internal.push(link);
            }
        } else if seen_external.insert(link.url.clone()) {
            links.external.push(link);
        }
    }

    links
}

fn base_url(document: &Html, page_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .and_then(|el| el.value().attr("href"))
                .and_then(|href| page_url.join(href.trim()).ok())
        })
        .unwrap_or_else(|| page_url.clone())
}

/// Resolve an href to an absolute http(s) URL without fragment
fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute)
}

fn in_navigation(anchor: ElementRef) -> bool {
    anchor.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|el| NAVIGATION_ELEMENTS.contains(&el.name()))
    })
}
