//! Language strategies
//!
//! Everything that differs between content languages lives behind
//! [`LanguageStrategy`]: stop words, syllable counting, the readability
//! formula and its levels, issue message templates, and the language-specific
//! rule switches. Analysis and rules ask the strategy instead of branching on
//! the language themselves.

use crate::rules::{IssueKind, IssueText};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hungarian,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hungarian => "hu",
        }
    }

    /// Matches the primary subtag of a BCP 47 tag (`hu-HU` -> Hungarian)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?.trim().to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::English),
            "hu" => Some(Self::Hungarian),
            _ => None,
        }
    }

    pub fn strategy(&self) -> &'static dyn LanguageStrategy {
        match self {
            Self::English => &ENGLISH,
            Self::Hungarian => &HUNGARIAN,
        }
    }
}

/// Readability formula result before level bucketing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadabilityFormula {
    pub score: f64,
    pub method: &'static str,
}

pub trait LanguageStrategy: Send + Sync {
    fn language(&self) -> Language;

    fn is_stop_word(&self, word: &str) -> bool;

    fn count_syllables(&self, word: &str) -> usize;

    /// Unclamped reading-ease score from average sentence length and
    /// average syllables per word
    fn reading_ease(&self, avg_sentence_length: f64, avg_syllables_per_word: f64)
        -> ReadabilityFormula;

    fn readability_level(&self, score: f64) -> &'static str;

    fn describe(&self, kind: &IssueKind) -> IssueText;

    /// Content in this language is expected to declare hreflang alternates
    fn expects_hreflang(&self) -> bool {
        false
    }

    /// Expected `og:locale`, when the language checks it
    fn expected_og_locale(&self) -> Option<&'static str> {
        None
    }

    /// First local place name mentioned in the lower-cased text
    fn local_place_mention(&self, _text: &str) -> Option<&'static str> {
        None
    }

    /// Whether the text mentions prices in the local currency
    fn mentions_price(&self, _text: &str) -> bool {
        false
    }

    /// How strongly the text reads as this language
    fn language_analysis(&self, text: &str) -> LanguageAnalysis;
}

/// Language-specific signals measured on the visible text
///
/// `pattern_score` is the number of typical word-pattern matches per word.
/// The character and suffix ratios are only measured for Hungarian.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageAnalysis {
    pub language: Language,
    pub pattern_score: f64,
    /// Share of the distinct characters that are Hungarian accented letters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_ratio: Option<f64>,
    /// Share of words ending in a common case suffix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix_ratio: Option<f64>,
}

fn pattern_score(lowered: &str, patterns: &[Regex]) -> f64 {
    let words = lowered.split_whitespace().count();
    if words == 0 {
        return 0.0;
    }
    let matches: usize = patterns.iter().map(|p| p.find_iter(lowered).count()).sum();
    matches as f64 / words as f64
}

/// Picks a strategy from the visible text, falling back to `<html lang>`
///
/// The first 100 words are scored against each language's stop words; the
/// language with the most hits wins. With no clear winner the declared
/// language is used if known, else English.
pub fn detect_language(text: &str, html_lang: Option<&str>) -> Language {
    let mut english = 0usize;
    let mut hungarian = 0usize;

    for word in text.split_whitespace().take(100) {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word.is_empty() {
            continue;
        }
        let en = ENGLISH.is_stop_word(&word);
        let hu = HUNGARIAN.is_stop_word(&word);
        // Shared words ("a", "is") carry no signal
        if en && !hu {
            english += 1;
        } else if hu && !en {
            hungarian += 1;
        }
    }

    if hungarian > english {
        Language::Hungarian
    } else if english > hungarian {
        Language::English
    } else {
        html_lang
            .and_then(Language::from_tag)
            .unwrap_or(Language::English)
    }
}

/// Counts vowel groups, at least one per word
fn vowel_groups(word: &str, vowels: &str) -> usize {
    let mut count = 0;
    let mut previous_was_vowel = false;
    for c in word.chars().flat_map(char::to_lowercase) {
        let is_vowel = vowels.contains(c);
        if is_vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = is_vowel;
    }
    count
}

static ENGLISH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(the|and|that|have|for|not|with|you|this|but)\b",
        r"\b(ing|ed|er|est)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

pub struct English {
    stop_words: LazyLock<HashSet<&'static str>>,
}

pub static ENGLISH: English = English {
    stop_words: LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect()),
};

impl LanguageStrategy for English {
    fn language(&self) -> Language {
        Language::English
    }

    fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    fn count_syllables(&self, word: &str) -> usize {
        let mut count = vowel_groups(word, "aeiouy");
        if word.to_lowercase().ends_with('e') && count > 1 {
            count -= 1;
        }
        count.max(1)
    }

    fn reading_ease(&self, asl: f64, asw: f64) -> ReadabilityFormula {
        ReadabilityFormula {
            score: 206.835 - 1.015 * asl - 84.6 * asw,
            method: "flesch",
        }
    }

    fn readability_level(&self, score: f64) -> &'static str {
        match score {
            s if s >= 90.0 => "very_easy",
            s if s >= 80.0 => "easy",
            s if s >= 70.0 => "fairly_easy",
            s if s >= 60.0 => "standard",
            s if s >= 50.0 => "fairly_difficult",
            s if s >= 30.0 => "difficult",
            _ => "very_difficult",
        }
    }

    fn language_analysis(&self, text: &str) -> LanguageAnalysis {
        LanguageAnalysis {
            language: Language::English,
            pattern_score: pattern_score(&text.to_lowercase(), &ENGLISH_PATTERNS),
            char_ratio: None,
            suffix_ratio: None,
        }
    }

    fn describe(&self, kind: &IssueKind) -> IssueText {
        match kind {
            IssueKind::MissingTitle => IssueText::new(
                "Page is missing a title tag",
                "Add a descriptive title tag between 30-60 characters",
            ),
            IssueKind::EmptyTitle => IssueText::new(
                "Title tag is empty",
                "Add descriptive content to the title tag",
            ),
            IssueKind::ShortTitle { length } => IssueText::new(
                format!("Title tag is too short ({} characters)", length),
                "Expand title to 30-60 characters for better SEO",
            ),
            IssueKind::LongTitle { length } => IssueText::new(
                format!("Title tag is too long ({} characters)", length),
                "Shorten title to under 60 characters to prevent truncation",
            ),
            IssueKind::MissingMetaDescription => IssueText::new(
                "Page is missing a meta description",
                "Add a compelling meta description between 120-160 characters",
            ),
            IssueKind::EmptyMetaDescription => IssueText::new(
                "Meta description is empty",
                "Add descriptive content to the meta description",
            ),
            IssueKind::ShortMetaDescription { length } => IssueText::new(
                format!("Meta description is short ({} characters)", length),
                "Expand meta description to 120-160 characters",
            ),
            IssueKind::LongMetaDescription { length } => IssueText::new(
                format!("Meta description is too long ({} characters)", length),
                "Shorten meta description to under 160 characters",
            ),
            IssueKind::MissingH1 => IssueText::new(
                "Page is missing an H1 tag",
                "Add one H1 tag that describes the main topic of the page",
            ),
            IssueKind::MultipleH1 { count } => IssueText::new(
                format!("Page has {} H1 tags", count),
                "Use only one H1 tag per page",
            ),
            IssueKind::SkippedHeadingLevel { from, to } => IssueText::new(
                format!("Heading structure skips from H{} to H{}", from, to),
                "Use sequential heading levels for better accessibility",
            ),
            IssueKind::MissingCanonical => IssueText::new(
                "Page is missing a canonical tag",
                "Add a canonical tag to prevent duplicate content issues",
            ),
            IssueKind::NonSelfCanonical { .. } => IssueText::new(
                "Canonical tag points to a different URL",
                "Verify if this canonical reference is intentional",
            ),
            IssueKind::NoindexFound { .. } => IssueText::new(
                "Page has noindex directive",
                "Remove noindex if you want this page to be indexed",
            ),
            IssueKind::NofollowFound { .. } => IssueText::new(
                "Page has nofollow directive",
                "Remove nofollow if you want links to be followed",
            ),
            IssueKind::NotHttps { .. } => IssueText::new(
                "Page is not served over HTTPS",
                "Implement SSL certificate and redirect HTTP to HTTPS",
            ),
            IssueKind::MissingSchema => IssueText::new(
                "Page has no structured data markup",
                "Add relevant schema markup to help search engines understand your content",
            ),
            IssueKind::MissingLocalBusinessSchema { place } => IssueText::new(
                format!(
                    "Local business schema markup is missing although {} is mentioned",
                    place
                ),
                "Add LocalBusiness or Organization schema markup to improve local SEO",
            ),
            IssueKind::MissingPriceSchema => IssueText::new(
                "Prices are mentioned without schema markup",
                "Add PriceSpecification or Product schema markup for prices",
            ),
            IssueKind::UnoptimizedImages { count } => IssueText::new(
                format!("{} images may not be optimized", count),
                "Add width/height attributes and consider responsive images",
            ),
            IssueKind::LargeDom { elements } => IssueText::new(
                format!("Large DOM size ({} elements)", elements),
                "Reduce DOM complexity for better performance",
            ),
            IssueKind::MissingAltText { count } => IssueText::new(
                format!("{} images are missing alt text", count),
                "Add descriptive alt text to all images",
            ),
            IssueKind::InputsWithoutLabels { count } => IssueText::new(
                format!("{} form inputs lack proper labels", count),
                "Associate all form inputs with descriptive labels",
            ),
            IssueKind::MissingHtmlLang { expected } => IssueText::new(
                "Missing lang attribute in html tag",
                format!("Add lang=\"{}\" attribute to html tag", expected),
            ),
            IssueKind::IncorrectHtmlLang { found, expected } => IssueText::new(
                format!(
                    "HTML lang attribute ({}) does not match detected language ({})",
                    found, expected
                ),
                format!("Change lang attribute to \"{}\"", expected),
            ),
            IssueKind::MissingHreflang => IssueText::new(
                "Missing hreflang tags",
                "Consider adding hreflang tags for international SEO",
            ),
            IssueKind::NonUtf8Charset { charset } => IssueText::new(
                format!("Character encoding is {} instead of UTF-8", charset),
                "Switch the character encoding to UTF-8",
            ),
            IssueKind::NonUtf8ContentType { .. } => IssueText::new(
                "Content-Type header does not declare UTF-8",
                "Add charset=utf-8 to the Content-Type header",
            ),
            IssueKind::MissingOgTitle => IssueText::new(
                "Missing Open Graph title",
                "Add og:title meta tag for better social media sharing",
            ),
            IssueKind::MissingOgDescription => IssueText::new(
                "Missing Open Graph description",
                "Add og:description meta tag for better social media sharing",
            ),
            IssueKind::MissingOgImage => IssueText::new(
                "Missing Open Graph image",
                "Add og:image meta tag for better social media sharing",
            ),
            IssueKind::MissingOgLocale { expected } => IssueText::new(
                "Missing og:locale meta tag",
                format!("Add an og:locale meta tag with the value \"{}\"", expected),
            ),
            IssueKind::IncorrectOgLocale { found, expected } => IssueText::new(
                format!("og:locale ({}) does not match the content language", found),
                format!("Change og:locale to \"{}\"", expected),
            ),
            IssueKind::MissingViewport => IssueText::new(
                "Page has no viewport meta tag",
                "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
            ),
            IssueKind::SmallTouchTargets { undersized, total } => IssueText::new(
                format!("{} of {} touch targets are smaller than 48px", undersized, total),
                "Make links and buttons at least 48x48 pixels on mobile",
            ),
        }
    }
}

pub struct Hungarian {
    stop_words: LazyLock<HashSet<&'static str>>,
}

pub static HUNGARIAN: Hungarian = Hungarian {
    stop_words: LazyLock::new(|| HUNGARIAN_STOP_WORDS.iter().copied().collect()),
};

const HUNGARIAN_PLACES: &[&str] = &["budapest", "debrecen", "szeged", "miskolc", "pécs", "győr"];

static FORINT_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d+\s*ft\b|\bforint\b").unwrap());

const HUNGARIAN_ACCENTED: &str = "áéíóöőúüű";

const HUNGARIAN_SUFFIXES: &[&str] = &[
    "nak", "nek", "ban", "ben", "ból", "ből", "hoz", "hez", "höz", "tól", "től",
];

static HUNGARIAN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(hogy|amit|amely|amelyet|amikor|ahol)\b",
        r"\b(van|volt|lesz|lenne|lehet)\b",
        r"\b(egy|kettő|három|négy|öt)\b",
        r"\b(magyar|magyarország|budapest)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl LanguageStrategy for Hungarian {
    fn language(&self) -> Language {
        Language::Hungarian
    }

    fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    fn count_syllables(&self, word: &str) -> usize {
        vowel_groups(word, "aáeéiíoóöőuúüű").max(1)
    }

    fn reading_ease(&self, asl: f64, asw: f64) -> ReadabilityFormula {
        ReadabilityFormula {
            score: 200.0 - 1.1 * asl - 60.0 * asw,
            method: "hungarian_adapted",
        }
    }

    fn readability_level(&self, score: f64) -> &'static str {
        match score {
            s if s >= 80.0 => "very_easy",
            s if s >= 65.0 => "easy",
            s if s >= 50.0 => "medium",
            s if s >= 35.0 => "difficult",
            _ => "very_difficult",
        }
    }

    fn expects_hreflang(&self) -> bool {
        true
    }

    fn expected_og_locale(&self) -> Option<&'static str> {
        Some("hu_HU")
    }

    fn local_place_mention(&self, text: &str) -> Option<&'static str> {
        HUNGARIAN_PLACES.iter().copied().find(|place| text.contains(place))
    }

    fn language_analysis(&self, text: &str) -> LanguageAnalysis {
        let lowered = text.to_lowercase();

        let distinct: HashSet<char> = lowered.chars().collect();
        let accented = distinct
            .iter()
            .filter(|c| HUNGARIAN_ACCENTED.contains(**c))
            .count();
        let char_ratio = if distinct.is_empty() {
            0.0
        } else {
            round3(accented as f64 / distinct.len() as f64)
        };

        let words: Vec<&str> = lowered.split_whitespace().collect();
        let suffixed = words
            .iter()
            .filter(|word| HUNGARIAN_SUFFIXES.iter().any(|suffix| word.ends_with(suffix)))
            .count();
        let suffix_ratio = if words.is_empty() {
            0.0
        } else {
            suffixed as f64 / words.len() as f64
        };

        LanguageAnalysis {
            language: Language::Hungarian,
            pattern_score: pattern_score(&lowered, &HUNGARIAN_PATTERNS),
            char_ratio: Some(char_ratio),
            suffix_ratio: Some(suffix_ratio),
        }
    }

    fn mentions_price(&self, text: &str) -> bool {
        FORINT_PRICE.is_match(text)
    }

    fn describe(&self, kind: &IssueKind) -> IssueText {
        match kind {
            IssueKind::MissingTitle => IssueText::new(
                "Az oldal nem tartalmaz title tag-et",
                "Adjon hozzá egy leíró title tag-et 30-60 karakter között",
            ),
            IssueKind::EmptyTitle => IssueText::new(
                "A title tag üres",
                "Adjon tartalmat a title tag-hez",
            ),
            IssueKind::ShortTitle { length } => IssueText::new(
                format!("A title tag túl rövid ({} karakter)", length),
                "Bővítse a title-t 30-60 karakterre a jobb SEO érdekében",
            ),
            IssueKind::LongTitle { length } => IssueText::new(
                format!("A title tag túl hosszú ({} karakter)", length),
                "Rövidítse a title-t 60 karakter alá a csonkítás elkerülése érdekében",
            ),
            IssueKind::MissingMetaDescription => IssueText::new(
                "Az oldal nem tartalmaz meta description-t",
                "Adjon hozzá egy vonzó meta description-t 120-160 karakter között",
            ),
            IssueKind::EmptyMetaDescription => IssueText::new(
                "A meta description üres",
                "Adjon leíró tartalmat a meta description-höz",
            ),
            IssueKind::ShortMetaDescription { length } => IssueText::new(
                format!("A meta description rövid ({} karakter)", length),
                "Bővítse a meta description-t 120-160 karakterre",
            ),
            IssueKind::LongMetaDescription { length } => IssueText::new(
                format!("A meta description túl hosszú ({} karakter)", length),
                "Rövidítse a meta description-t 160 karakter alá",
            ),
            IssueKind::MissingH1 => IssueText::new(
                "Az oldal nem tartalmaz H1 tag-et",
                "Adjon hozzá egy H1 tag-et, amely leírja az oldal fő témáját",
            ),
            IssueKind::MultipleH1 { count } => IssueText::new(
                format!("Az oldal {} H1 tag-et tartalmaz", count),
                "Használjon csak egy H1 tag-et oldalanként",
            ),
            IssueKind::SkippedHeadingLevel { from, to } => IssueText::new(
                format!("A címsor-hierarchia H{}-ről H{}-ra ugrik", from, to),
                "Használjon egymást követő címsor szinteket az akadálymentesség érdekében",
            ),
            IssueKind::MissingCanonical => IssueText::new(
                "Az oldal nem tartalmaz canonical tag-et",
                "Adjon hozzá canonical tag-et a duplikált tartalom problémák elkerülése érdekében",
            ),
            IssueKind::NonSelfCanonical { .. } => IssueText::new(
                "A canonical tag másik URL-re mutat",
                "Ellenőrizze, hogy a canonical hivatkozás szándékos-e",
            ),
            IssueKind::NoindexFound { .. } => IssueText::new(
                "Az oldal noindex direktívát tartalmaz",
                "Távolítsa el a noindex-et, ha szeretné, hogy az oldal indexelve legyen",
            ),
            IssueKind::NofollowFound { .. } => IssueText::new(
                "Az oldal nofollow direktívát tartalmaz",
                "Távolítsa el a nofollow-t, ha szeretné, hogy a linkeket kövessék",
            ),
            IssueKind::NotHttps { .. } => IssueText::new(
                "Az oldal nem HTTPS-en keresztül érhető el",
                "Telepítsen SSL tanúsítványt és irányítsa át a HTTP forgalmat HTTPS-re",
            ),
            IssueKind::MissingSchema => IssueText::new(
                "Az oldal nem tartalmaz strukturált adatot",
                "Adjon hozzá releváns schema markup-ot, hogy a keresők jobban értsék a tartalmat",
            ),
            IssueKind::MissingLocalBusinessSchema { .. } => IssueText::new(
                "Helyi üzlet séma markup hiányzik magyar helységnév említése ellenére",
                "Adjon hozzá LocalBusiness vagy Organization schema markup-ot a helyi SEO javítása érdekében",
            ),
            IssueKind::MissingPriceSchema => IssueText::new(
                "Árinfó észlelve séma markup nélkül",
                "Adjon hozzá PriceSpecification vagy Product schema markup-ot az árakhoz",
            ),
            IssueKind::UnoptimizedImages { count } => IssueText::new(
                format!("{} kép valószínűleg nincs optimalizálva", count),
                "Adjon meg width/height attribútumokat és használjon reszponzív képeket",
            ),
            IssueKind::LargeDom { elements } => IssueText::new(
                format!("Túl nagy DOM méret ({} elem)", elements),
                "Csökkentse a DOM összetettségét a jobb teljesítmény érdekében",
            ),
            IssueKind::MissingAltText { count } => IssueText::new(
                format!("{} képről hiányzik az alt szöveg", count),
                "Adjon leíró alt szöveget minden képhez",
            ),
            IssueKind::InputsWithoutLabels { count } => IssueText::new(
                format!("{} űrlapmezőhöz nem tartozik címke", count),
                "Rendeljen leíró label elemet minden űrlapmezőhöz",
            ),
            IssueKind::MissingHtmlLang { expected } => IssueText::new(
                "Hiányzik a lang attribútum a html tag-ből",
                format!("Adja hozzá a lang=\"{}\" attribútumot a html tag-hez", expected),
            ),
            IssueKind::IncorrectHtmlLang { found, expected } => IssueText::new(
                format!(
                    "A html lang attribútum ({}) nem egyezik az észlelt nyelvvel ({})",
                    found, expected
                ),
                format!("Változtassa a lang attribútumot \"{}\"-re", expected),
            ),
            IssueKind::MissingHreflang => IssueText::new(
                "Hiányoznak a hreflang tag-ek",
                "Fontolja meg hreflang tag-ek hozzáadását a nemzetközi SEO javítása érdekében",
            ),
            IssueKind::NonUtf8Charset { .. } => IssueText::new(
                "A karakterkódolás nem UTF-8, ami problémákat okozhat a magyar karakterekkel",
                "Változtassa a karakterkódolást UTF-8-ra a magyar karakterek helyes megjelenítéséhez",
            ),
            IssueKind::NonUtf8ContentType { .. } => IssueText::new(
                "A Content-Type nem tartalmazza az UTF-8 kódolást",
                "Adja hozzá a charset=utf-8 paramétert a Content-Type header-hez",
            ),
            IssueKind::MissingOgTitle => IssueText::new(
                "Hiányzik az Open Graph title",
                "Adjon hozzá og:title meta tag-et a jobb közösségi média megosztáshoz",
            ),
            IssueKind::MissingOgDescription => IssueText::new(
                "Hiányzik az Open Graph description",
                "Adjon hozzá og:description meta tag-et a jobb közösségi média megosztáshoz",
            ),
            IssueKind::MissingOgImage => IssueText::new(
                "Hiányzik az Open Graph image",
                "Adjon hozzá og:image meta tag-et a jobb közösségi média megosztáshoz",
            ),
            IssueKind::MissingOgLocale { expected } => IssueText::new(
                "Hiányzik az og:locale meta tag",
                format!("Adjon hozzá og:locale meta tag-et \"{}\" értékkel", expected),
            ),
            IssueKind::IncorrectOgLocale { found, expected } => IssueText::new(
                format!("Az og:locale ({}) nem megfelelő a magyar tartalomhoz", found),
                format!("Változtassa az og:locale értékét \"{}\"-ra", expected),
            ),
            IssueKind::MissingViewport => IssueText::new(
                "Az oldal nem tartalmaz viewport meta tag-et",
                "Adja hozzá: <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
            ),
            IssueKind::SmallTouchTargets { undersized, total } => IssueText::new(
                format!("{} / {} érintési célpont kisebb 48px-nél", undersized, total),
                "Mobilon a linkek és gombok legyenek legalább 48x48 pixelesek",
            ),
        }
    }
}

const ENGLISH_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "up", "about", "into", "through", "during", "before", "after", "above", "below",
    "over", "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will", "just",
    "should", "now", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "get", "got", "make", "made", "go", "went", "come", "came", "see",
    "saw", "know", "knew", "take", "took", "think", "thought", "this", "that", "these", "those",
    "it", "its", "you", "your", "we", "our", "they", "their", "he", "she", "his", "her", "which",
    "what", "who", "would", "could",
];

const HUNGARIAN_STOP_WORDS: &[&str] = &[
    "a", "az", "egy", "és", "van", "volt", "lesz", "be", "ki", "le", "fel", "el", "meg", "át",
    "rá", "ide", "oda", "hogy", "mint", "vagy", "de", "ha", "mert", "mivel", "amikor", "ahol",
    "aki", "ami", "amely", "amelyet", "ezt", "azt", "itt", "ott", "akkor", "most", "már", "még",
    "csak", "is", "nem", "igen", "talán", "lehet", "kell", "fog", "tud", "akar", "szeret", "lát",
    "hall", "mond", "gondol", "hisz", "tudja", "látja", "hallja", "mondja", "gondolja", "hiszi",
    "ellen", "mellett", "között", "alatt", "felett", "előtt", "után", "közben", "során",
    "nélkül", "helyett", "miatt", "végett", "számára", "részére", "által", "felől", "felé",
    "minden", "semmi", "valami", "némely", "több", "kevés", "sok", "elég", "túl", "nagyon",
    "kissé", "kettő", "három", "négy", "öt", "hat", "hét", "nyolc", "kilenc", "tíz", "száz",
    "ezer", "millió", "első", "második", "harmadik", "utolsó", "nagy", "kicsi", "jó", "rossz",
    "új", "régi", "fiatal", "öreg", "szép", "csúnya", "hosszú", "rövid", "magas", "alacsony",
    "vastag", "vékony", "nehéz", "könnyű", "gyors", "lassú", "meleg", "hideg", "forró", "jeges",
    "világos", "sötét", "tiszta", "piszkos", "teljes", "üres",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Language::from_tag("hu-HU"), Some(Language::Hungarian));
        assert_eq!(Language::from_tag("EN_us"), Some(Language::English));
        assert_eq!(Language::from_tag("de"), None);
    }

    #[test]
    fn test_detect_english() {
        let text = "This is the page about our products and how you can use them";
        assert_eq!(detect_language(text, None), Language::English);
    }

    #[test]
    fn test_detect_hungarian() {
        let text = "Ez az oldal arról szól, hogy mit kínálunk és miért érdemes minket választani";
        assert_eq!(detect_language(text, Some("en")), Language::Hungarian);
    }

    #[test]
    fn test_detect_falls_back_to_declared_language() {
        assert_eq!(detect_language("Kft Zrt 12345", Some("hu")), Language::Hungarian);
        assert_eq!(detect_language("", Some("fr")), Language::English);
        assert_eq!(detect_language("", None), Language::English);
    }

    #[test]
    fn test_english_syllables() {
        assert_eq!(ENGLISH.count_syllables("cat"), 1);
        assert_eq!(ENGLISH.count_syllables("table"), 1);
        assert_eq!(ENGLISH.count_syllables("reading"), 2);
        assert_eq!(ENGLISH.count_syllables("the"), 1);
        assert_eq!(ENGLISH.count_syllables("rhythm"), 1);
        assert_eq!(ENGLISH.count_syllables("beautiful"), 3);
    }

    #[test]
    fn test_hungarian_syllables() {
        assert_eq!(HUNGARIAN.count_syllables("ház"), 1);
        assert_eq!(HUNGARIAN.count_syllables("könyvtár"), 2);
        assert_eq!(HUNGARIAN.count_syllables("őszülő"), 3);
    }

    #[test]
    fn test_levels() {
        assert_eq!(ENGLISH.readability_level(95.0), "very_easy");
        assert_eq!(ENGLISH.readability_level(65.0), "standard");
        assert_eq!(ENGLISH.readability_level(10.0), "very_difficult");
        assert_eq!(HUNGARIAN.readability_level(66.0), "easy");
        assert_eq!(HUNGARIAN.readability_level(50.0), "medium");
    }

    #[test]
    fn test_hungarian_switches() {
        assert!(HUNGARIAN.expects_hreflang());
        assert!(!ENGLISH.expects_hreflang());
        assert_eq!(HUNGARIAN.expected_og_locale(), Some("hu_HU"));
        assert_eq!(
            HUNGARIAN.local_place_mention("irodánk budapest belvárosában"),
            Some("budapest")
        );
        assert!(HUNGARIAN.mentions_price("ára 4990 Ft"));
        assert!(HUNGARIAN.mentions_price("néhány forint"));
        assert!(!HUNGARIAN.mentions_price("lift"));
        assert!(!ENGLISH.mentions_price("price 10 ft"));
    }

    #[test]
    fn test_hungarian_language_analysis() {
        // distinct chars: a, b, á, n, " ", h, z -> 1 accented of 7
        let analysis = HUNGARIAN.language_analysis("A bában ház");
        assert_eq!(analysis.language, Language::Hungarian);
        assert_eq!(analysis.char_ratio, Some(0.143));
        // "bában" ends in -ban
        assert_eq!(analysis.suffix_ratio, Some(1.0 / 3.0));
        assert_eq!(analysis.pattern_score, 0.0);

        let analysis = HUNGARIAN.language_analysis("Ez egy ház, ami van Budapesten");
        // "egy" and "van"; "budapesten" is not a whole-word match
        assert_eq!(analysis.pattern_score, 2.0 / 6.0);
        assert_eq!(analysis.suffix_ratio, Some(0.0));
    }

    #[test]
    fn test_english_language_analysis() {
        let analysis = ENGLISH.language_analysis("The cat and the dog sat with you");
        assert_eq!(analysis.language, Language::English);
        // the, and, the, with, you
        assert_eq!(analysis.pattern_score, 5.0 / 8.0);
        assert_eq!(analysis.char_ratio, None);
        assert_eq!(analysis.suffix_ratio, None);

        assert_eq!(ENGLISH.language_analysis("").pattern_score, 0.0);
    }

    #[test]
    fn test_messages_are_localized() {
        let kind = IssueKind::ShortTitle { length: 25 };
        assert_eq!(
            ENGLISH.describe(&kind).description,
            "Title tag is too short (25 characters)"
        );
        assert_eq!(
            HUNGARIAN.describe(&kind).description,
            "A title tag túl rövid (25 karakter)"
        );
    }
}
