//! Visible text extraction and content fingerprinting

use scraper::{ElementRef, Html, Node, Selector};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Elements that never render as text
const NON_RENDERED: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Non-rendered elements plus site chrome
const NON_CONTENT: &[&str] = &[
    "head", "script", "style", "noscript", "template", "nav", "footer",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub word_count: usize,
    pub character_count: usize,
    pub paragraph_count: usize,
}

/// Whitespace-collapsed visible text of a document
///
/// Text nodes are joined with single spaces, so `<p>a</p><p>b</p>` yields
/// `"a b"`.
pub fn visible_text(document: &Html) -> String {
    text_without(document, NON_CONTENT)
}

/// Everything a reader can see, navigation and footer included
pub fn rendered_text(document: &Html) -> String {
    text_without(document, NON_RENDERED)
}

fn text_without(document: &Html, skipped: &[&str]) -> String {
    let mut chunks: Vec<&str> = Vec::new();
    collect_text(document.root_element(), skipped, &mut chunks);
    collapse_whitespace(&chunks.join(" "))
}

fn collect_text<'a>(element: ElementRef<'a>, skipped: &[&str], chunks: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => chunks.push(text),
            Node::Element(el) if !skipped.contains(&el.name()) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, skipped, chunks);
                }
            }
            _ => {}
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn text_stats(document: &Html, text: &str) -> TextStats {
    let paragraph_count = Selector::parse("p")
        .map(|sel| {
            document
                .select(&sel)
                .filter(|p| p.text().any(|t| !t.trim().is_empty()))
                .count()
        })
        .unwrap_or(0);

    TextStats {
        word_count: text.split_whitespace().count(),
        character_count: text.chars().count(),
        paragraph_count,
    }
}

/// Hex-encoded SHA-256 of normalized visible text
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
