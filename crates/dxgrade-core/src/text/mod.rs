//! Negation-aware keyword utilities shared by the mapper and scoring engine.

mod procedures;

pub use procedures::*;

use regex::Regex;

/// Clinical negation detection, supplied by an external model.
///
/// `is_negated` reports whether the occurrences of `span` inside `sentence`
/// are negated ("no evidence of X", "X was ruled out"). When the span occurs
/// more than once, implementations should return true only if every
/// occurrence is negated, so that a single affirmed mention keeps the keyword
/// positive.
pub trait NegationDetector: Send + Sync {
    fn is_negated(&self, sentence: &str, span: &str) -> bool;
}

/// Null detector: treats every mention as affirmed.
pub struct NoNegation;

impl NegationDetector for NoNegation {
    fn is_negated(&self, _sentence: &str, _span: &str) -> bool {
        false
    }
}

/// Case-insensitive whole-word containment. Handles multi-word terms; a term
/// inside a longer word does not count.
pub fn contains_word(text: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return false;
    }
    let pattern = format!(r"(?i)\b{}\b", regex::escape(term));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

/// Delete ASCII punctuation, mirroring the normalization applied before
/// rule matching.
pub fn remove_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// Fuzzy string similarity on the familiar 0..=100 scale.
pub fn fuzzy_ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) * 100.0
}

/// Whole-word keyword lookup with negation screening.
pub struct KeywordChecker<'a> {
    detector: &'a dyn NegationDetector,
}

impl<'a> KeywordChecker<'a> {
    pub fn new(detector: &'a dyn NegationDetector) -> Self {
        Self { detector }
    }

    /// True when `keyword` appears whole-word in `sentence` and that mention
    /// is not negated. The keyword may be a `|`-separated alternation
    /// ("nsaid|ibuprofen|aspirin"); any positive alternative suffices. An
    /// empty keyword is never positive.
    pub fn is_positive(&self, sentence: &str, keyword: &str) -> bool {
        keyword
            .split('|')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .any(|alt| {
                contains_word(sentence, alt) && !self.detector.is_negated(sentence, alt)
            })
    }

    /// True when any keyword in the list is positive in the sentence.
    pub fn any_positive(&self, sentence: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| self.is_positive(sentence, kw))
    }

    pub fn detector(&self) -> &'a dyn NegationDetector {
        self.detector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal test detector: a span is negated when it is preceded by
    /// "no evidence of" in the sentence.
    struct PhraseNegation;

    impl NegationDetector for PhraseNegation {
        fn is_negated(&self, sentence: &str, span: &str) -> bool {
            let lower = sentence.to_lowercase();
            match lower.find(&span.to_lowercase()) {
                Some(pos) => lower[..pos].contains("no evidence of"),
                None => false,
            }
        }
    }

    #[test]
    fn test_contains_word_whole_word_only() {
        assert!(contains_word("acute pericarditis noted", "pericarditis"));
        assert!(!contains_word("pericardial effusion", "pericarditis"));
        assert!(contains_word("status post pericardial window", "pericardial window"));
        assert!(contains_word("PE was confirmed", "pe"));
        assert!(!contains_word("peritonitis", "pe"));
    }

    #[test]
    fn test_contains_word_empty_term() {
        assert!(!contains_word("anything", ""));
        assert!(!contains_word("anything", "   "));
    }

    #[test]
    fn test_remove_punctuation() {
        assert_eq!(
            remove_punctuation("acute, gangrenous cholecystitis."),
            "acute gangrenous cholecystitis"
        );
        assert_eq!(remove_punctuation("**pe**"), "pe");
    }

    #[test]
    fn test_fuzzy_ratio_scale() {
        assert!((fuzzy_ratio("appendicitis", "appendicitis") - 100.0).abs() < 1e-9);
        assert!(fuzzy_ratio("appendicitis", "appendicitis") > 90.0);
        // One-letter typo stays above the mapper threshold
        assert!(fuzzy_ratio("appendicitus", "appendicitis") > 90.0);
        assert!(fuzzy_ratio("appendicitis", "pancreatitis") < 90.0);
    }

    #[test]
    fn test_is_positive_simple() {
        let checker = KeywordChecker::new(&NoNegation);
        assert!(checker.is_positive("patient has appendicitis", "appendicitis"));
        assert!(!checker.is_positive("patient has appendicitis", "cholecystitis"));
        assert!(!checker.is_positive("patient has appendicitis", ""));
    }

    #[test]
    fn test_is_positive_respects_negation() {
        let checker = KeywordChecker::new(&PhraseNegation);
        assert!(checker.is_positive("ct shows appendicitis", "appendicitis"));
        assert!(!checker.is_positive("no evidence of appendicitis", "appendicitis"));
    }

    #[test]
    fn test_is_positive_alternation() {
        let checker = KeywordChecker::new(&NoNegation);
        assert!(checker.is_positive("started on ibuprofen", "nsaid|ibuprofen|aspirin"));
        assert!(!checker.is_positive("started on colchicine", "nsaid|ibuprofen|aspirin"));
    }

    #[test]
    fn test_any_positive() {
        let checker = KeywordChecker::new(&NoNegation);
        assert!(checker.any_positive("given ceftriaxone overnight", &["azithromycin", "ceftriaxone"]));
        assert!(!checker.any_positive("supportive care only", &["azithromycin", "ceftriaxone"]));
    }
}
