//! Head and body facts read straight from the markup

use crate::analyze::readability::round2;
use crate::analyze::text::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Input types that need an accessible label
const LABELLED_INPUT_TYPES: &[&str] = &[
    "text", "email", "password", "tel", "search", "url", "number",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
    /// Heading levels in document order
    pub outline: Vec<u8>,
}

impl Headings {
    fn push(&mut self, level: u8, text: String) {
        let list = match level {
            1 => &mut self.h1,
            2 => &mut self.h2,
            3 => &mut self.h3,
            4 => &mut self.h4,
            5 => &mut self.h5,
            _ => &mut self.h6,
        };
        list.push(text);
        self.outline.push(level);
    }

    /// First place where the outline jumps down more than one level
    pub fn first_skip(&self) -> Option<(u8, u8)> {
        self.outline
            .windows(2)
            .find(|pair| pair[1] > pair[0] + 1)
            .map(|pair| (pair[0], pair[1]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hreflang {
    pub lang: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageStats {
    pub total: usize,
    /// `alt` absent or empty
    pub missing_alt: usize,
    pub missing_src: usize,
    /// No `width`, no `height` and no `srcset`
    pub unsized_images: usize,
    /// Percentage of images with a non-empty `alt`
    pub alt_coverage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentFacts {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub headings: Headings,
    pub canonical: Option<String>,
    pub html_lang: Option<String>,
    pub charset: Option<String>,
    pub robots_directives: Option<String>,
    pub hreflang: Vec<Hreflang>,
    /// `og:*` and `twitter:*` tags; the first occurrence of a key wins
    pub social_tags: BTreeMap<String, String>,
    pub images: ImageStats,
    pub dom_element_count: usize,
    pub unlabeled_inputs: usize,
    pub viewport: Option<String>,
    pub script_count: usize,
    pub stylesheet_count: usize,
}

impl DocumentFacts {
    pub fn first_h1(&self) -> Option<&str> {
        self.headings.h1.first().map(String::as_str)
    }
}

pub fn document_facts(document: &Html) -> DocumentFacts {
    DocumentFacts {
        title: first_text(document, "title"),
        meta_description: named_meta(document, "description"),
        headings: headings(document),
        canonical: canonical(document),
        html_lang: attr_of(document, "html[lang]", "lang")
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty()),
        charset: charset(document),
        robots_directives: named_meta(document, "robots").filter(|d| !d.is_empty()),
        hreflang: hreflang(document),
        social_tags: social_tags(document),
        images: image_stats(document),
        dom_element_count: document
            .root_element()
            .descendants()
            .filter(|node| node.value().is_element())
            .count(),
        unlabeled_inputs: unlabeled_inputs(document),
        viewport: named_meta(document, "viewport"),
        script_count: count(document, "script[src]"),
        stylesheet_count: select_all(document, "link[rel]")
            .filter(|el| has_rel(el, "stylesheet"))
            .count(),
    }
}

fn select_all<'a>(document: &'a Html, selector: &str) -> impl Iterator<Item = ElementRef<'a>> {
    let elements: Vec<ElementRef<'a>> = match Selector::parse(selector) {
        Ok(sel) => document.select(&sel).collect(),
        Err(_) => Vec::new(),
    };
    elements.into_iter()
}

fn count(document: &Html, selector: &str) -> usize {
    select_all(document, selector).count()
}

fn element_text(el: ElementRef) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// `None` when the element is absent, `Some("")` when it is empty
fn first_text(document: &Html, selector: &str) -> Option<String> {
    select_all(document, selector).next().map(element_text)
}

fn attr_of(document: &Html, selector: &str, attr: &str) -> Option<String> {
    select_all(document, selector)
        .next()
        .and_then(|el| el.value().attr(attr).map(str::to_string))
}

/// Content of `<meta name="...">`, matching the name case-insensitively
fn named_meta(document: &Html, name: &str) -> Option<String> {
    select_all(document, "meta[name]")
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .map(|el| el.value().attr("content").unwrap_or_default().trim().to_string())
}

fn has_rel(el: &ElementRef, token: &str) -> bool {
    el.value()
        .attr("rel")
        .is_some_and(|rel| rel.split_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
}

fn headings(document: &Html) -> Headings {
    let mut headings = Headings::default();
    for el in select_all(document, "h1, h2, h3, h4, h5, h6") {
        let level = el.value().name()[1..].parse::<u8>().unwrap_or(6);
        headings.push(level, element_text(el));
    }
    headings
}

fn canonical(document: &Html) -> Option<String> {
    select_all(document, "link[rel][href]")
        .find(|el| has_rel(el, "canonical"))
        .and_then(|el| el.value().attr("href"))
        .map(|href| href.trim().to_string())
}

fn charset(document: &Html) -> Option<String> {
    if let Some(charset) = attr_of(document, "meta[charset]", "charset") {
        return Some(charset.trim().to_string());
    }

    select_all(document, "meta[http-equiv][content]")
        .find(|el| {
            el.value()
                .attr("http-equiv")
                .is_some_and(|h| h.eq_ignore_ascii_case("content-type"))
        })
        .and_then(|el| el.value().attr("content").and_then(charset_param))
}

/// The `charset=` parameter of a content type value
pub fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

fn hreflang(document: &Html) -> Vec<Hreflang> {
    select_all(document, "link[hreflang][href]")
        .filter(|el| has_rel(el, "alternate"))
        .filter_map(|el| {
            Some(Hreflang {
                lang: el.value().attr("hreflang")?.trim().to_string(),
                href: el.value().attr("href")?.trim().to_string(),
            })
        })
        .collect()
}

fn social_tags(document: &Html) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    for el in select_all(document, "meta[content]") {
        let key = el
            .value()
            .attr("property")
            .or_else(|| el.value().attr("name"))
            .map(|k| k.trim().to_lowercase());
        let Some(key) = key else { continue };
        if key.starts_with("og:") || key.starts_with("twitter:") {
            let content = el.value().attr("content").unwrap_or_default().trim();
            tags.entry(key).or_insert_with(|| content.to_string());
        }
    }
    tags
}

fn image_stats(document: &Html) -> ImageStats {
    let mut stats = ImageStats::default();
    for img in select_all(document, "img") {
        let el = img.value();
        stats.total += 1;
        if el.attr("alt").map_or(true, str::is_empty) {
            stats.missing_alt += 1;
        }
        if el.attr("src").map_or(true, |src| src.trim().is_empty()) {
            stats.missing_src += 1;
        }
        let has_dimension = ["width", "height"]
            .iter()
            .any(|name| el.attr(name).is_some_and(|value| !value.is_empty()));
        if !has_dimension && el.attr("srcset").is_none() {
            stats.unsized_images += 1;
        }
    }
    stats.alt_coverage = if stats.total == 0 {
        100.0
    } else {
        round2((stats.total - stats.missing_alt) as f64 / stats.total as f64 * 100.0)
    };
    stats
}

fn unlabeled_inputs(document: &Html) -> usize {
    let labelled_ids: HashSet<String> = select_all(document, "label[for]")
        .filter_map(|el| el.value().attr("for").map(|id| id.trim().to_string()))
        .collect();

    select_all(document, "input")
        .filter(|input| {
            let el = input.value();
            let kind = el.attr("type").unwrap_or("text").trim().to_lowercase();
            if !LABELLED_INPUT_TYPES.contains(&kind.as_str()) {
                return false;
            }
            let aria = el.attr("aria-label").is_some() || el.attr("aria-labelledby").is_some();
            let for_label = el
                .attr("id")
                .is_some_and(|id| labelled_ids.contains(id.trim()));
            let wrapped = input.ancestors().any(|node| {
                node.value()
                    .as_element()
                    .is_some_and(|parent| parent.name() == "label")
            });
            !(aria || for_label || wrapped)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(html: &str) -> DocumentFacts {
        document_facts(&Html::parse_document(html))
    }

    #[test]
    fn test_title_conventions() {
        assert_eq!(facts("<html><head></head></html>").title, None);
        assert_eq!(
            facts("<html><head><title>  </title></head></html>").title,
            Some(String::new())
        );
        assert_eq!(
            facts("<title> Coffee   Shop </title>").title.as_deref(),
            Some("Coffee Shop")
        );
    }

    #[test]
    fn test_meta_description_case_insensitive_name() {
        let result = facts(r#"<meta name="Description" content=" Fresh beans daily. ">"#);
        assert_eq!(result.meta_description.as_deref(), Some("Fresh beans daily."));
        assert_eq!(facts("<p>x</p>").meta_description, None);
    }

    #[test]
    fn test_headings_and_skip() {
        let result = facts("<h1>Main</h1><h2>Sub</h2><h4>Deep</h4><h2>Again</h2>");
        assert_eq!(result.first_h1(), Some("Main"));
        assert_eq!(result.headings.h2, vec!["Sub", "Again"]);
        assert_eq!(result.headings.outline, vec![1, 2, 4, 2]);
        assert_eq!(result.headings.first_skip(), Some((2, 4)));

        let flat = facts("<h1>A</h1><h2>B</h2><h3>C</h3><h1>D</h1>");
        assert_eq!(flat.headings.first_skip(), None);
    }

    #[test]
    fn test_head_links_and_lang() {
        let result = facts(
            r#"<html lang="hu-HU"><head>
                <meta charset="ISO-8859-2">
                <link rel="canonical" href=" https://example.com/a ">
                <link rel="alternate" hreflang="en" href="https://example.com/en/a">
                <meta name="robots" content="noindex, follow">
                <meta name="viewport" content="width=device-width">
            </head></html>"#,
        );
        assert_eq!(result.html_lang.as_deref(), Some("hu-HU"));
        assert_eq!(result.charset.as_deref(), Some("ISO-8859-2"));
        assert_eq!(result.canonical.as_deref(), Some("https://example.com/a"));
        assert_eq!(result.hreflang.len(), 1);
        assert_eq!(result.hreflang[0].lang, "en");
        assert_eq!(result.robots_directives.as_deref(), Some("noindex, follow"));
        assert_eq!(result.viewport.as_deref(), Some("width=device-width"));
    }

    #[test]
    fn test_http_equiv_charset() {
        let result = facts(
            r#"<meta http-equiv="Content-Type" content="text/html; charset=windows-1250">"#,
        );
        assert_eq!(result.charset.as_deref(), Some("windows-1250"));
    }

    #[test]
    fn test_charset_param() {
        assert_eq!(
            charset_param("text/html; charset=\"UTF-8\"").as_deref(),
            Some("UTF-8")
        );
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn test_social_tags() {
        let result = facts(
            r#"<meta property="og:title" content="Title">
               <meta property="og:title" content="Second">
               <meta name="twitter:card" content="summary">
               <meta name="author" content="Someone">"#,
        );
        assert_eq!(result.social_tags.len(), 2);
        assert_eq!(result.social_tags["og:title"], "Title");
        assert_eq!(result.social_tags["twitter:card"], "summary");
    }

    #[test]
    fn test_image_stats() {
        let result = facts(
            r#"<img src="/a.jpg" alt="A" width="10" height="10">
               <img src="/b.jpg" alt="">
               <img src="/c.jpg" alt="C" srcset="/c2.jpg 2x">
               <img data-src="/d.jpg" width="120">"#,
        );
        let images = result.images;
        assert_eq!(images.total, 4);
        assert_eq!(images.missing_alt, 2);
        assert_eq!(images.missing_src, 1);
        assert_eq!(images.unsized_images, 1);
        assert_eq!(images.alt_coverage, 50.0);
    }

    #[test]
    fn test_unlabeled_inputs() {
        let result = facts(
            r#"<form>
                <label for="email">Email</label><input id="email" type="email">
                <label>Name <input type="text"></label>
                <input type="search" aria-label="Search">
                <input name="phone" type="tel">
                <input name="q">
                <input type="submit">
                <input type="hidden" name="token">
            </form>"#,
        );
        assert_eq!(result.unlabeled_inputs, 2);
    }

    #[test]
    fn test_counts() {
        let result = facts(
            r#"<html><head>
                <script src="/a.js"></script><script>inline()</script>
                <link rel="stylesheet" href="/s.css"><link rel="icon" href="/f.ico">
            </head><body><p>x</p></body></html>"#,
        );
        assert_eq!(result.script_count, 1);
        assert_eq!(result.stylesheet_count, 1);
        // html, head, script x2, link x2, body, p
        assert_eq!(result.dom_element_count, 8);
    }
}
