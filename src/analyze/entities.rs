//! Best-effort named entity extraction
//!
//! A real NER model can be plugged in through [`EntityExtractor`]. The
//! bundled [`CapitalizedPhraseExtractor`] only tags runs of two or more
//! capitalized words that do not start a sentence.

use crate::analyze::Language;
use serde::Serialize;
use std::collections::BTreeSet;

/// Longest text handed to an extractor
const MAX_ENTITY_TEXT: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

pub trait EntityExtractor: Send + Sync {
    /// Entities found in `text`; errors are the extractor's own business and
    /// should surface as an empty list
    fn extract(&self, text: &str, language: Language) -> Vec<Entity>;
}

/// Runs the extractor on the first [`MAX_ENTITY_TEXT`] bytes of `text`
pub fn extract_entities(
    extractor: Option<&dyn EntityExtractor>,
    text: &str,
    language: Language,
) -> Vec<Entity> {
    let Some(extractor) = extractor else {
        return Vec::new();
    };

    let mut end = text.len().min(MAX_ENTITY_TEXT);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    extractor.extract(&text[..end], language)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalizedPhraseExtractor;

impl EntityExtractor for CapitalizedPhraseExtractor {
    fn extract(&self, text: &str, _language: Language) -> Vec<Entity> {
        let mut found: BTreeSet<String> = BTreeSet::new();
        let mut run: Vec<&str> = Vec::new();
        let mut sentence_start = true;

        for raw in text.split_whitespace() {
            let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
            let capitalized = word.chars().next().is_some_and(char::is_uppercase)
                && word.chars().skip(1).any(char::is_lowercase);

            if capitalized && !(sentence_start && run.is_empty()) {
                run.push(word);
            } else {
                flush_run(&mut run, &mut found);
            }

            // Punctuation after a word ends the phrase
            if raw.ends_with(|c: char| matches!(c, ',' | ';' | ':' | '.' | '!' | '?')) {
                flush_run(&mut run, &mut found);
            }
            sentence_start = raw.ends_with(|c: char| matches!(c, '.' | '!' | '?'));
        }
        flush_run(&mut run, &mut found);

        found
            .into_iter()
            .map(|text| Entity {
                text,
                label: "PROPER_NOUN".to_string(),
            })
            .collect()
    }
}

fn flush_run(run: &mut Vec<&str>, found: &mut BTreeSet<String>) {
    if run.len() >= 2 {
        found.insert(run.join(" "));
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_extractor_is_empty() {
        assert!(extract_entities(None, "Acme Corp", Language::English).is_empty());
    }

    #[test]
    fn test_capitalized_phrases() {
        let text = "Our office near Central Park opened in May. Visit Acme Coffee Roasters, \
                    or call New York support.";
        let entities = extract_entities(
            Some(&CapitalizedPhraseExtractor),
            text,
            Language::English,
        );
        let names: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();

        assert_eq!(names, vec!["Acme Coffee Roasters", "Central Park", "New York"]);
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let text = "é".repeat(MAX_ENTITY_TEXT);
        let entities = extract_entities(
            Some(&CapitalizedPhraseExtractor),
            &text,
            Language::Hungarian,
        );
        assert!(entities.is_empty());
    }
}
