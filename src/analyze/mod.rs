//! Page Analyzer
//!
//! Turns fetched content into a [`PageRecord`]: links, text statistics,
//! readability, keyword density, language, entities, structured data,
//! head metadata, image and accessibility facts, and the optional mobile
//! analysis. Analysis is pure; the same input always yields the same record.

mod document;
mod entities;
mod keywords;
mod language;
mod links;
mod mobile;
mod readability;
mod structured;
mod text;

pub use document::{charset_param, document_facts, DocumentFacts, Headings, Hreflang, ImageStats};
pub use entities::{extract_entities, CapitalizedPhraseExtractor, Entity, EntityExtractor};
pub use keywords::{keyword_density, KeywordDensity, KeywordTerm};
pub use language::{
    detect_language, English, Hungarian, Language, LanguageAnalysis, LanguageStrategy,
    ReadabilityFormula, ENGLISH, HUNGARIAN,
};
pub use links::{extract_links, Link, PageLinks};
pub use mobile::{analyze_mobile, MobileAnalysis, MIN_TOUCH_TARGET_PX};
pub use readability::{count_sentences, readability, Readability};
pub(crate) use readability::round2;
pub use structured::{extract_structured_data, StructuredBlock, StructuredFormat};
pub use text::{
    collapse_whitespace, fingerprint, rendered_text, text_stats, visible_text, TextStats,
};

use crate::fetch::FetchedPage;
use scraper::Html;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceMetrics {
    pub fetch_ms: u64,
    pub render_ms: Option<u64>,
    pub transfer_bytes: usize,
    pub script_count: usize,
    pub stylesheet_count: usize,
    pub image_count: usize,
}

/// Everything learned about one crawled page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub final_url: String,
    pub status_code: u16,
    pub depth: u32,
    pub load_time_ms: u64,
    pub byte_size: usize,
    pub content_type: String,

    /// `None` when the tag is absent, `Some("")` when it is empty
    pub title: Option<String>,
    /// Same convention as `title`
    pub meta_description: Option<String>,
    pub h1: Option<String>,
    pub canonical: Option<String>,
    pub html_lang: Option<String>,
    pub language: Language,
    pub language_analysis: LanguageAnalysis,
    pub charset: Option<String>,
    pub robots_directives: Option<String>,
    pub hreflang: Vec<Hreflang>,

    pub text: TextStats,
    pub readability: Readability,
    pub keywords: KeywordDensity,
    pub entities: Vec<Entity>,
    pub headings: Headings,
    pub structured_data: Vec<StructuredBlock>,
    pub social_tags: BTreeMap<String, String>,
    pub images: ImageStats,
    pub dom_element_count: usize,
    pub unlabeled_inputs: usize,
    pub viewport: Option<String>,

    pub internal_links: Vec<Link>,
    pub external_links: Vec<Link>,
    /// SHA-256 hex of the normalized visible text
    pub content_hash: String,

    pub performance: PerformanceMetrics,
    pub mobile: Option<MobileAnalysis>,
    pub screenshot: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl PageRecord {
    pub fn strategy(&self) -> &'static dyn LanguageStrategy {
        self.language.strategy()
    }
}

#[derive(Clone, Default)]
pub struct PageAnalyzer {
    entity_extractor: Option<Arc<dyn EntityExtractor>>,
}

impl PageAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity_extractor(mut self, extractor: Arc<dyn EntityExtractor>) -> Self {
        self.entity_extractor = Some(extractor);
        self
    }

    pub fn analyze(&self, page: &FetchedPage, depth: u32) -> PageRecord {
        let document = Html::parse_document(&page.body);
        let facts = document_facts(&document);
        let text = visible_text(&document);

        let language = detect_language(&text, facts.html_lang.as_deref());
        let strategy = language.strategy();
        let links = extract_links(&document, &page.final_url, &page.url);
        let entities = extract_entities(self.entity_extractor.as_deref(), &text, language);

        debug!(
            "Analyzed {} ({:?}, {} words, {} internal links)",
            page.final_url,
            language,
            text.split_whitespace().count(),
            links.internal.len()
        );

        let performance = PerformanceMetrics {
            fetch_ms: page.fetch_time.as_millis() as u64,
            render_ms: page.render_time.map(|d| d.as_millis() as u64),
            transfer_bytes: page.bytes,
            script_count: facts.script_count,
            stylesheet_count: facts.stylesheet_count,
            image_count: facts.images.total,
        };

        PageRecord {
            url: page.url.to_string(),
            final_url: page.final_url.to_string(),
            status_code: page.status_code,
            depth,
            load_time_ms: performance.fetch_ms,
            byte_size: page.bytes,
            content_type: page.content_type.clone(),
            h1: facts.first_h1().map(str::to_string),
            title: facts.title,
            meta_description: facts.meta_description,
            canonical: facts.canonical,
            html_lang: facts.html_lang,
            language,
            language_analysis: strategy.language_analysis(&text),
            charset: facts.charset,
            robots_directives: facts.robots_directives,
            hreflang: facts.hreflang,
            text: text_stats(&document, &text),
            readability: readability(&text, strategy),
            keywords: keyword_density(&text, strategy),
            entities,
            headings: facts.headings,
            structured_data: extract_structured_data(&document),
            social_tags: facts.social_tags,
            images: facts.images,
            dom_element_count: facts.dom_element_count,
            unlabeled_inputs: facts.unlabeled_inputs,
            viewport: facts.viewport,
            internal_links: links.internal,
            external_links: links.external,
            content_hash: fingerprint(&text),
            performance,
            mobile: page.mobile_body.as_deref().map(analyze_mobile),
            screenshot: page
                .screenshot
                .as_ref()
                .map(|path| path.display().to_string()),
            headers: page.headers.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::fetch::FetchedPage;
    use std::collections::BTreeMap;
    use std::time::Duration;
    use url::Url;

    /// A static 200 response for `url` with `body`
    pub fn fetched(url: &str, body: &str) -> FetchedPage {
        let url = Url::parse(url).unwrap();
        FetchedPage {
            final_url: url.clone(),
            url,
            status_code: 200,
            headers: BTreeMap::from([(
                "content-type".to_string(),
                "text/html; charset=utf-8".to_string(),
            )]),
            content_type: "text/html; charset=utf-8".to_string(),
            bytes: body.len(),
            body: body.to_string(),
            fetch_time: Duration::from_millis(120),
            render_time: None,
            mobile_body: None,
            screenshot: None,
        }
    }
}
