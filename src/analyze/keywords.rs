use crate::analyze::readability::round2;
use crate::analyze::LanguageStrategy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Terms reported per page
const TOP_TERMS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordTerm {
    pub term: String,
    pub count: usize,
    /// Percentage of all words, two decimals
    pub density: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordDensity {
    /// Most frequent terms first; ties in alphabetical order
    pub terms: Vec<KeywordTerm>,
    pub total_words: usize,
    pub unique_terms: usize,
    pub vocabulary_richness: f64,
}

/// Keyword density after stop-word and short-token removal
///
/// Only the top 20 terms are considered, and of those only terms that occur
/// more than once are reported. Density is relative to every word on the
/// page, stop words included.
pub fn keyword_density(text: &str, strategy: &dyn LanguageStrategy) -> KeywordDensity {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = WORD.find_iter(&lowered).map(|m| m.as_str()).collect();
    let total_words = words.len();
    if total_words == 0 {
        return KeywordDensity::default();
    }

    let filtered: Vec<&str> = words
        .into_iter()
        .filter(|w| w.chars().count() > 2 && !strategy.is_stop_word(w))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &word in &filtered {
        *counts.entry(word).or_insert(0) += 1;
    }

    let unique_terms = counts.len();
    let vocabulary_richness = if filtered.is_empty() {
        0.0
    } else {
        round2(unique_terms as f64 / filtered.len() as f64)
    };

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let terms = ranked
        .into_iter()
        .take(TOP_TERMS)
        .filter(|(_, count)| *count > 1)
        .map(|(term, count)| KeywordTerm {
            term: term.to_string(),
            count,
            density: round2(count as f64 / total_words as f64 * 100.0),
        })
        .collect();

    KeywordDensity {
        terms,
        total_words,
        unique_terms,
        vocabulary_richness,
    }
}
