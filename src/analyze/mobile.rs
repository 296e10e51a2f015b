//! Facts about the mobile-viewport rendering of a page

use crate::analyze::text::visible_text;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;

/// Smallest comfortable touch target edge, in CSS pixels
pub const MIN_TOUCH_TARGET_PX: f64 = 48.0;

const TOUCH_TARGETS: &str = "a[href], button, input, select, textarea";

static INLINE_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*(?:min-)?(?:width|height)\s*:\s*(\d+(?:\.\d+)?)px").unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MobileAnalysis {
    pub has_viewport: bool,
    pub viewport_content: Option<String>,
    pub touch_targets: usize,
    /// Targets with an explicit width or height below 48px
    pub undersized_touch_targets: usize,
    pub word_count: usize,
}

pub fn analyze_mobile(html: &str) -> MobileAnalysis {
    let document = Html::parse_document(html);

    let viewport_content = Selector::parse("meta[name]").ok().and_then(|sel| {
        document
            .select(&sel)
            .find(|el| {
                el.value()
                    .attr("name")
                    .is_some_and(|n| n.trim().eq_ignore_ascii_case("viewport"))
            })
            .map(|el| el.value().attr("content").unwrap_or_default().trim().to_string())
    });

    let mut touch_targets = 0;
    let mut undersized_touch_targets = 0;
    if let Ok(sel) = Selector::parse(TOUCH_TARGETS) {
        for el in document.select(&sel) {
            if el.value().attr("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")) {
                continue;
            }
            touch_targets += 1;
            if is_undersized(el) {
                undersized_touch_targets += 1;
            }
        }
    }

    MobileAnalysis {
        has_viewport: viewport_content.is_some(),
        viewport_content,
        touch_targets,
        undersized_touch_targets,
        word_count: visible_text(&document).split_whitespace().count(),
    }
}

fn is_undersized(el: ElementRef) -> bool {
    let node = el.value();
    let attr_small = ["width", "height"].iter().any(|name| {
        node.attr(name)
            .and_then(|v| v.trim().trim_end_matches("px").parse::<f64>().ok())
            .is_some_and(|px| px < MIN_TOUCH_TARGET_PX)
    });
    let style_small = node.attr("style").is_some_and(|style| {
        INLINE_SIZE
            .captures_iter(style)
            .filter_map(|cap| cap[1].parse::<f64>().ok())
            .any(|px| px < MIN_TOUCH_TARGET_PX)
    });
    attr_small || style_small
}
