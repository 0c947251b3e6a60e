//! Canonical diagnosis mapping onto the closed pathology taxonomy.

use serde::{Deserialize, Serialize};

use crate::extract::Extractor;
use crate::models::{Pathology, RuleSet, RuleTable};
use crate::text::{fuzzy_ratio, remove_punctuation, KeywordChecker, NegationDetector};

/// Fuzzy similarity a token must exceed against a pathology name.
const FUZZY_NAME_THRESHOLD: f64 = 90.0;

/// Result of canonical mapping. Unmatched input is a normal terminal
/// outcome, not a fault: the extracted phrase is passed through unchanged
/// and the caller treats it as "other/unmapped".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappedDiagnosis {
    Label(Pathology),
    Unmapped(String),
}

impl MappedDiagnosis {
    /// The normalized label text: the pathology name, or the original phrase
    /// when unmapped.
    pub fn label(&self) -> &str {
        match self {
            MappedDiagnosis::Label(p) => p.name(),
            MappedDiagnosis::Unmapped(s) => s,
        }
    }

    pub fn pathology(&self) -> Option<Pathology> {
        match self {
            MappedDiagnosis::Label(p) => Some(*p),
            MappedDiagnosis::Unmapped(_) => None,
        }
    }
}

/// Maps extracted diagnosis phrases to pathology labels.
///
/// Pathologies are tried in [`Pathology::ALL`] order and the first one whose
/// rules fire wins; that enumeration order is the documented tie-break for
/// phrases that could match more than one disease.
pub struct Mapper<'a> {
    rules: &'a RuleTable,
    checker: KeywordChecker<'a>,
    extractor: Extractor,
}

impl<'a> Mapper<'a> {
    pub fn new(rules: &'a RuleTable, detector: &'a dyn NegationDetector) -> Self {
        Self {
            rules,
            checker: KeywordChecker::new(detector),
            extractor: Extractor::new(),
        }
    }

    /// Map an extracted diagnosis phrase, confirming every matched term
    /// against the original sentence for negation.
    ///
    /// Match priority within each pathology: regex patterns, then fuzzy
    /// similarity of individual tokens against the pathology name, then
    /// strict rules, then lenient rules.
    pub fn map(&self, original_sentence: &str, extracted_diagnosis: &str) -> MappedDiagnosis {
        if extracted_diagnosis.trim().is_empty() {
            return MappedDiagnosis::Unmapped(String::new());
        }

        for (pathology, rule_set) in self.rules.iter() {
            if self.matches_pathology(pathology, rule_set, original_sentence, extracted_diagnosis)
            {
                return MappedDiagnosis::Label(pathology);
            }
        }

        MappedDiagnosis::Unmapped(extracted_diagnosis.to_string())
    }

    /// Extract the diagnosis clause from a raw completion and map it, using
    /// the full completion as the negation context.
    pub fn extract_and_map(&self, raw_text: &str) -> MappedDiagnosis {
        let extracted = self.extractor.extract(raw_text);
        self.map(raw_text, &extracted)
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    fn matches_pathology(
        &self,
        pathology: Pathology,
        rule_set: &RuleSet,
        original_sentence: &str,
        extracted_diagnosis: &str,
    ) -> bool {
        // Regex patterns have the highest priority.
        for pattern in &rule_set.regex_patterns {
            if let Some(m) = pattern.find(extracted_diagnosis) {
                if self.checker.is_positive(original_sentence, m.as_str()) {
                    return true;
                }
            }
        }

        // Token-level fuzzy similarity against the pathology name.
        let normalized = remove_punctuation(&extracted_diagnosis.to_lowercase());
        for token in normalized.split_whitespace() {
            if fuzzy_ratio(token, pathology.name()) > FUZZY_NAME_THRESHOLD
                && self.checker.is_positive(original_sentence, token)
            {
                return true;
            }
        }

        // Strict alternatives, then lenient ones.
        for rule in rule_set.strict.iter().chain(rule_set.lenient.iter()) {
            if rule.matches(&normalized, original_sentence, self.checker.detector()) {
                return true;
            }
        }

        false
    }
}
