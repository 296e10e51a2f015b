//! Reading-ease scoring

use crate::analyze::LanguageStrategy;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readability {
    /// Clamped to [0, 100], two decimals
    pub score: f64,
    pub level: &'static str,
    pub method: &'static str,
    pub avg_sentence_length: f64,
    pub avg_syllables_per_word: f64,
}

impl Readability {
    fn unknown(method: &'static str) -> Self {
        Self {
            score: 0.0,
            level: "unknown",
            method,
            avg_sentence_length: 0.0,
            avg_syllables_per_word: 0.0,
        }
    }
}

/// Sentences are runs of terminal punctuation
pub fn count_sentences(text: &str) -> usize {
    let mut count = 0;
    let mut in_run = false;
    for c in text.chars() {
        let terminal = matches!(c, '.' | '!' | '?');
        if terminal && !in_run {
            count += 1;
        }
        in_run = terminal;
    }
    count
}

pub fn readability(text: &str, strategy: &dyn LanguageStrategy) -> Readability {
    // Method name is needed for the empty case too
    let method = strategy.reading_ease(0.0, 0.0).method;

    let sentences = count_sentences(text);
    let words: Vec<&str> = text.split_whitespace().collect();
    if sentences == 0 || words.is_empty() {
        return Readability::unknown(method);
    }

    let syllables: usize = words
        .iter()
        .map(|w| strategy.count_syllables(w.trim_matches(|c: char| !c.is_alphanumeric())))
        .sum();

    let asl = words.len() as f64 / sentences as f64;
    let asw = syllables as f64 / words.len() as f64;
    let formula = strategy.reading_ease(asl, asw);
    let score = round2(formula.score.clamp(0.0, 100.0));

    Readability {
        score,
        level: strategy.readability_level(score),
        method: formula.method,
        avg_sentence_length: round2(asl),
        avg_syllables_per_word: round2(asw),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
