//! Per-pathology rubric scoring.
//!
//! Each disease supplies a [`PathologyRubric`] (imaging tiers, required and
//! neutral lab sets, treatment logic); [`CaseScorer`] drives the shared
//! contract. A scorer is consumed by [`CaseScorer::evaluate`], so one
//! instance scores exactly one case and scores can never leak between
//! patients.

mod appendicitis;
mod cholecystitis;
mod diverticulitis;
mod pancreatitis;
mod pericarditis;
mod pneumonia;
mod pulmonary_embolism;

pub use appendicitis::AppendicitisRubric;
pub use cholecystitis::CholecystitisRubric;
pub use diverticulitis::DiverticulitisRubric;
pub use pancreatitis::PancreatitisRubric;
pub use pericarditis::PericarditisRubric;
pub use pneumonia::PneumoniaRubric;
pub use pulmonary_embolism::PulmonaryEmbolismRubric;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::extract::Extractor;
use crate::models::{
    Case, LabCategory, Pathology, Region, RuleSet, RuleTable, ScoreRecord,
    TreatmentReconciliation,
};
use crate::text::{fuzzy_ratio, remove_punctuation, KeywordChecker, NegationDetector};

/// Scoring errors.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("malformed case {case_id}: {reason}")]
    MalformedCase { case_id: String, reason: String },
}

pub type ScoreResult<T> = Result<T, ScoreError>;

/// Requested/required treatment flags for one case.
#[derive(Debug, Clone, Default)]
pub struct TreatmentFlags {
    pub requested: BTreeMap<String, bool>,
    pub required: BTreeMap<String, bool>,
}

impl TreatmentFlags {
    fn from_defaults(treatments: &[(&'static str, bool)]) -> Self {
        Self {
            requested: treatments
                .iter()
                .map(|(name, _)| (name.to_string(), false))
                .collect(),
            required: treatments
                .iter()
                .map(|(name, default)| (name.to_string(), *default))
                .collect(),
        }
    }

    /// Mark a treatment as requested by the model.
    pub fn request(&mut self, name: &str) {
        self.requested.insert(name.to_string(), true);
    }

    /// Force a treatment's requirement on, from a severity predicate.
    pub fn require(&mut self, name: &str) {
        self.required.insert(name.to_string(), true);
    }
}

/// Disease-specific rubric consumed by [`CaseScorer`].
pub trait PathologyRubric: Send + Sync {
    fn pathology(&self) -> Pathology;

    /// Tier value for an accepted imaging modality. `None` rejects the
    /// study.
    fn imaging_tier(&self, modality: &str) -> Option<f64>;

    fn required_labs(&self) -> &[LabCategory];

    /// General-panel tests tracked for completeness auditing only.
    fn neutral_labs(&self) -> &[u32];

    /// Treatment names with their default required flags.
    fn treatments(&self) -> &[(&'static str, bool)];

    /// Detect requested treatments from the case narrative and procedure
    /// codes, and apply severity overrides to the required flags.
    fn score_treatment(&self, case: &Case, checker: &KeywordChecker<'_>, flags: &mut TreatmentFlags);
}

/// Build the rubric for a pathology.
pub fn rubric_for(pathology: Pathology) -> Box<dyn PathologyRubric> {
    match pathology {
        Pathology::Appendicitis => Box::new(AppendicitisRubric::new()),
        Pathology::Cholecystitis => Box::new(CholecystitisRubric::new()),
        Pathology::Diverticulitis => Box::new(DiverticulitisRubric::new()),
        Pathology::Pancreatitis => Box::new(PancreatitisRubric::new()),
        Pathology::Pericarditis => Box::new(PericarditisRubric::new()),
        Pathology::Pneumonia => Box::new(PneumoniaRubric::new()),
        Pathology::PulmonaryEmbolism => Box::new(PulmonaryEmbolismRubric::new()),
    }
}

/// Fuzzy similarity a token must exceed against the pathology name for a
/// strict diagnosis credit.
const FUZZY_NAME_THRESHOLD: f64 = 90.0;

/// Scores a single case against one pathology rubric.
///
/// Construct a fresh scorer per case; `evaluate` consumes it.
pub struct CaseScorer<'a> {
    rubric: &'a dyn PathologyRubric,
    rule_set: &'a RuleSet,
    detector: &'a dyn NegationDetector,
    extractor: Extractor,
    diagnosis: f64,
    gracious_diagnosis: f64,
    imaging: f64,
    correct_labs: BTreeMap<String, Vec<u32>>,
    neutral_observed: Vec<u32>,
    flags: TreatmentFlags,
}

impl<'a> CaseScorer<'a> {
    pub fn new(
        rubric: &'a dyn PathologyRubric,
        rules: &'a RuleTable,
        detector: &'a dyn NegationDetector,
    ) -> Self {
        let correct_labs = rubric
            .required_labs()
            .iter()
            .map(|category| (category.name.to_string(), Vec::new()))
            .collect();
        Self {
            rubric,
            rule_set: rules.get(rubric.pathology()),
            detector,
            extractor: Extractor::new(),
            diagnosis: 0.0,
            gracious_diagnosis: 0.0,
            imaging: 0.0,
            correct_labs,
            neutral_observed: Vec::new(),
            flags: TreatmentFlags::from_defaults(rubric.treatments()),
        }
    }

    /// Run the full scoring pass for one case. Consumes the scorer.
    pub fn evaluate(mut self, case: &Case) -> ScoreResult<ScoreRecord> {
        self.validate(case)?;
        self.score_diagnosis(case);
        for observation in &case.imaging {
            self.score_imaging(observation.region, &observation.modality);
        }
        self.score_labs(case);
        self.score_treatment(case);
        Ok(self.finish())
    }

    fn validate(&self, case: &Case) -> ScoreResult<()> {
        if case.case_id.trim().is_empty() {
            return Err(ScoreError::MalformedCase {
                case_id: case.case_id.clone(),
                reason: "missing case id".into(),
            });
        }
        if case.prediction.trim().is_empty() {
            return Err(ScoreError::MalformedCase {
                case_id: case.case_id.clone(),
                reason: "missing prediction text".into(),
            });
        }
        Ok(())
    }

    /// Apply the pathology's rule set to the case's diagnosis text.
    /// Strict rules, regex patterns, and fuzzy name matches give full
    /// credit; a lenient rule alone gives the gracious credit only.
    pub fn score_diagnosis(&mut self, case: &Case) {
        let extracted = self.extractor.extract(&case.prediction);
        let context = case.context_text();
        let checker = KeywordChecker::new(self.detector);
        let normalized = remove_punctuation(&extracted.to_lowercase());

        if self.strict_match(&extracted, &normalized, context, &checker) {
            self.diagnosis = 1.0;
        } else if self
            .rule_set
            .lenient
            .iter()
            .any(|rule| rule.matches(&normalized, context, self.detector))
        {
            self.gracious_diagnosis = 1.0;
        }
    }

    fn strict_match(
        &self,
        extracted: &str,
        normalized: &str,
        context: &str,
        checker: &KeywordChecker<'_>,
    ) -> bool {
        for pattern in &self.rule_set.regex_patterns {
            if let Some(m) = pattern.find(extracted) {
                if checker.is_positive(context, m.as_str()) {
                    return true;
                }
            }
        }

        let name = self.rubric.pathology().name();
        for token in normalized.split_whitespace() {
            if fuzzy_ratio(token, name) > FUZZY_NAME_THRESHOLD
                && checker.is_positive(context, token)
            {
                return true;
            }
        }

        self.rule_set
            .strict
            .iter()
            .any(|rule| rule.matches(normalized, context, self.detector))
    }

    /// Fold one imaging study into the imaging score. The study is rejected
    /// when the region does not match the pathology or the modality is not
    /// in the rubric's tier table. The stored score is `max(current, tier)`:
    /// monotonic, never lowered by a weaker later study.
    pub fn score_imaging(&mut self, region: Region, modality: &str) -> bool {
        if region != self.rubric.pathology().region() {
            return false;
        }
        match self.rubric.imaging_tier(modality) {
            Some(tier) => {
                self.imaging = self.imaging.max(tier);
                true
            }
            None => false,
        }
    }

    /// Record which required-category tests were performed; neutral-panel
    /// tests are tracked separately and never scored.
    pub fn score_labs(&mut self, case: &Case) {
        for lab in &case.labs {
            let mut required = false;
            for category in self.rubric.required_labs() {
                if category.tests.contains(&lab.item_id) {
                    required = true;
                    let observed = self
                        .correct_labs
                        .get_mut(category.name)
                        .expect("categories registered at construction");
                    if !observed.contains(&lab.item_id) {
                        observed.push(lab.item_id);
                    }
                }
            }
            if !required
                && self.rubric.neutral_labs().contains(&lab.item_id)
                && !self.neutral_observed.contains(&lab.item_id)
            {
                self.neutral_observed.push(lab.item_id);
            }
        }
    }

    /// Detect requested treatments and compute required flags.
    pub fn score_treatment(&mut self, case: &Case) {
        let checker = KeywordChecker::new(self.detector);
        self.rubric.score_treatment(case, &checker, &mut self.flags);
    }

    /// Current imaging score, for callers folding studies incrementally.
    pub fn imaging_score(&self) -> f64 {
        self.imaging
    }

    /// Finalize into an immutable record.
    pub fn finish(self) -> ScoreRecord {
        let treatment =
            TreatmentReconciliation::from_maps(&self.flags.requested, &self.flags.required);
        ScoreRecord {
            diagnosis: self.diagnosis,
            gracious_diagnosis: self.gracious_diagnosis,
            imaging: self.imaging,
            correct_labs: self.correct_labs,
            neutral_labs: self.neutral_observed,
            treatment_requested: self.flags.requested,
            treatment_required: self.flags.required,
            treatment,
        }
    }
}
