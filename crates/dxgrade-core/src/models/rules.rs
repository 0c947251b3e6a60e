//! Pattern rules for canonical diagnosis mapping.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Pathology;
use crate::text::{contains_word, NegationDetector};

/// A location/modifier pattern for one way of phrasing a diagnosis.
///
/// The rule matches a piece of text when `location` occurs as a whole word
/// and, if `modifiers` is non-empty, at least one modifier also occurs as a
/// whole word. Both occurrences must additionally be non-negated in the
/// originating sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathologyRule {
    pub location: String,
    pub modifiers: Vec<String>,
}

impl PathologyRule {
    pub fn new(location: &str, modifiers: &[&str]) -> Self {
        Self {
            location: location.to_string(),
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Check this rule against normalized diagnosis text, confirming each
    /// matched term is non-negated in the original sentence.
    pub fn matches(
        &self,
        normalized_text: &str,
        original_sentence: &str,
        detector: &dyn NegationDetector,
    ) -> bool {
        if !contains_word(normalized_text, &self.location) {
            return false;
        }
        if detector.is_negated(original_sentence, &self.location) {
            return false;
        }
        if self.modifiers.is_empty() {
            return true;
        }
        self.modifiers.iter().any(|modifier| {
            contains_word(normalized_text, modifier)
                && !detector.is_negated(original_sentence, modifier)
        })
    }
}

/// The full matching rubric for one pathology.
///
/// Strict alternatives denote a confident match (full credit); lenient
/// alternatives denote a clinically related but imprecise match (partial
/// credit). Regex patterns, when present, take priority over everything else.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub strict: Vec<PathologyRule>,
    pub lenient: Vec<PathologyRule>,
    pub regex_patterns: Vec<Regex>,
}

impl RuleSet {
    pub fn new(strict: Vec<PathologyRule>, lenient: Vec<PathologyRule>) -> Self {
        Self {
            strict,
            lenient,
            regex_patterns: Vec::new(),
        }
    }

    pub fn with_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.regex_patterns = patterns;
        self
    }
}

/// Immutable pathology-to-ruleset table, built once at startup and shared
/// read-only across evaluations.
///
/// Iteration follows [`Pathology::ALL`]; that order is the mapper's
/// documented tie-break.
#[derive(Debug, Clone)]
pub struct RuleTable {
    entries: Vec<(Pathology, RuleSet)>,
}

impl RuleTable {
    /// Build a table from a constructor covering every pathology.
    pub fn from_fn(mut rule_set_for: impl FnMut(Pathology) -> RuleSet) -> Self {
        Self {
            entries: Pathology::ALL
                .iter()
                .map(|&p| (p, rule_set_for(p)))
                .collect(),
        }
    }

    pub fn get(&self, pathology: Pathology) -> &RuleSet {
        &self
            .entries
            .iter()
            .find(|(p, _)| *p == pathology)
            .expect("table covers every pathology")
            .1
    }

    /// Iterate in the fixed enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Pathology, &RuleSet)> {
        self.entries.iter().map(|(p, rs)| (*p, rs))
    }
}
