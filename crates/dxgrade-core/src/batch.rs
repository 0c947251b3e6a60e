//! Batch evaluation over many cases and multi-model consistency runs.
//!
//! Cases are independent and embarrassingly parallel; each gets its own
//! scorer instance so nothing leaks between patients. Per-case failures are
//! logged and reported, never fatal to the batch.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::compare::Comparator;
use crate::mapper::Mapper;
use crate::models::{Case, ConsistencyStatus, PairScore, Pathology, RuleTable, ScoreRecord};
use crate::scoring::{rubric_for, CaseScorer};
use crate::text::NegationDetector;

/// One case that could not be scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFailure {
    pub case_id: String,
    pub error: String,
}

/// Mean scores over the successfully evaluated cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAverages {
    pub diagnosis: f64,
    pub gracious_diagnosis: f64,
    pub imaging: f64,
}

/// Outcome of scoring one pathology's case set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub pathology: Pathology,
    pub records: Vec<(String, ScoreRecord)>,
    pub failures: Vec<CaseFailure>,
    pub generated_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Mean per-dimension scores; `None` when no case was evaluated.
    pub fn averages(&self) -> Option<BatchAverages> {
        if self.records.is_empty() {
            return None;
        }
        let n = self.records.len() as f64;
        Some(BatchAverages {
            diagnosis: self.records.iter().map(|(_, r)| r.diagnosis).sum::<f64>() / n,
            gracious_diagnosis: self
                .records
                .iter()
                .map(|(_, r)| r.gracious_diagnosis)
                .sum::<f64>()
                / n,
            imaging: self.records.iter().map(|(_, r)| r.imaging).sum::<f64>() / n,
        })
    }
}

/// Score every case against one pathology's rubric, in parallel. Each case
/// gets a fresh scorer; rule tables and the negation model are shared
/// read-only.
pub fn evaluate_batch(
    pathology: Pathology,
    cases: &[Case],
    rules: &RuleTable,
    detector: &dyn NegationDetector,
) -> BatchReport {
    let outcomes: Vec<Result<(String, ScoreRecord), CaseFailure>> = cases
        .par_iter()
        .map(|case| {
            let rubric = rubric_for(pathology);
            CaseScorer::new(rubric.as_ref(), rules, detector)
                .evaluate(case)
                .map(|record| (case.case_id.clone(), record))
                .map_err(|e| CaseFailure {
                    case_id: case.case_id.clone(),
                    error: e.to_string(),
                })
        })
        .collect();

    let mut records = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(entry) => records.push(entry),
            Err(failure) => {
                warn!(case_id = %failure.case_id, error = %failure.error, "case evaluation failed");
                failures.push(failure);
            }
        }
    }

    BatchReport {
        pathology,
        records,
        failures,
        generated_at: Utc::now(),
    }
}

/// One model's raw completions, keyed by case id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPredictions {
    pub model: String,
    pub predictions: BTreeMap<String, String>,
}

/// Per-case outcome of a multi-model comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseConsistency {
    pub case_id: String,
    pub status: ConsistencyStatus,
    pub scores: Vec<PairScore>,
    /// The mapped labels that were compared, in model order.
    pub diagnoses: Vec<String>,
}

/// Outcome of one multi-model consistency run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub cases: Vec<CaseConsistency>,
    pub consistent_ids: Vec<String>,
    pub inconsistent_ids: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ConsistencyReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    /// Fraction of common cases where the models agree; `None` with no
    /// common cases.
    pub fn consistency_rate(&self) -> Option<f64> {
        if self.cases.is_empty() {
            None
        } else {
            Some(self.consistent_ids.len() as f64 / self.cases.len() as f64)
        }
    }
}

/// Compare the diagnoses of 2-3 models over their common case ids. Each
/// prediction is extracted, mapped onto the taxonomy, and the normalized
/// labels compared by embedding similarity.
pub fn compare_models(
    models: &[ModelPredictions],
    comparator: &Comparator<'_>,
    mapper: &Mapper<'_>,
) -> ConsistencyReport {
    let mut report = ConsistencyReport {
        cases: Vec::new(),
        consistent_ids: Vec::new(),
        inconsistent_ids: Vec::new(),
        generated_at: Utc::now(),
    };

    if models.len() < 2 {
        warn!(models = models.len(), "need at least two models to compare");
        return report;
    }

    // Case ids present for every model, in sorted order.
    let mut common_ids: Vec<&String> = models[0].predictions.keys().collect();
    for model in &models[1..] {
        common_ids.retain(|id| model.predictions.contains_key(*id));
    }

    for case_id in common_ids {
        let diagnoses: Vec<String> = models
            .iter()
            .map(|m| {
                mapper
                    .extract_and_map(&m.predictions[case_id])
                    .label()
                    .to_string()
            })
            .collect();

        let (status, scores) = comparator.compare(&diagnoses);
        if status.is_consistent() {
            report.consistent_ids.push(case_id.clone());
        } else {
            report.inconsistent_ids.push(case_id.clone());
        }
        report.cases.push(CaseConsistency {
            case_id: case_id.clone(),
            status,
            scores,
            diagnoses,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Embedder;
    use crate::tables::clinical_rule_table;
    use crate::text::NoNegation;

    /// Embedder mapping each taxonomy label to its own one-hot vector, so
    /// equal labels are fully similar and distinct ones orthogonal.
    struct LabelEmbedder;

    impl Embedder for LabelEmbedder {
        fn encode(&self, text: &str) -> Vec<f32> {
            let labels = [
                "appendicitis",
                "cholecystitis",
                "diverticulitis",
                "pancreatitis",
                "pericarditis",
                "pneumonia",
                "pulmonary embolism",
            ];
            let mut v = vec![0.0f32; labels.len() + 1];
            match labels.iter().position(|l| *l == text) {
                Some(i) => v[i] = 1.0,
                None => *v.last_mut().unwrap() = 1.0,
            }
            v
        }
    }

    fn prediction_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_evaluate_batch_isolates_failures() {
        let rules = clinical_rule_table();
        let cases = vec![
            Case::new("1", "Final Diagnosis: Acute appendicitis"),
            Case::new("2", ""), // malformed: no prediction
            Case::new("3", "Final Diagnosis: Acute appendicitis"),
        ];

        let report = evaluate_batch(Pathology::Appendicitis, &cases, &rules, &NoNegation);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].case_id, "2");

        let averages = report.averages().unwrap();
        assert_eq!(averages.diagnosis, 1.0);
        assert_eq!(averages.gracious_diagnosis, 0.0);
    }

    #[test]
    fn test_empty_batch_has_no_averages() {
        let rules = clinical_rule_table();
        let report = evaluate_batch(Pathology::Appendicitis, &[], &rules, &NoNegation);
        assert!(report.averages().is_none());
    }

    #[test]
    fn test_compare_models_over_common_ids() {
        let rules = clinical_rule_table();
        let mapper = Mapper::new(&rules, &NoNegation);
        let embedder = LabelEmbedder;
        let comparator = Comparator::new(&embedder);

        let models = vec![
            ModelPredictions {
                model: "model-a".into(),
                predictions: prediction_map(&[
                    ("1", "Final Diagnosis: Acute appendicitis"),
                    ("2", "Final Diagnosis: Acute cholecystitis"),
                    ("3", "Final Diagnosis: Pneumonia, bacterial"),
                ]),
            },
            ModelPredictions {
                model: "model-b".into(),
                predictions: prediction_map(&[
                    ("1", "Final Diagnosis: appendicitis with rupture"),
                    ("2", "Final Diagnosis: Acute pancreatitis"),
                    // Case 3 missing for model-b: not a common id.
                ]),
            },
        ];

        let report = compare_models(&models, &comparator, &mapper);
        assert_eq!(report.total(), 2);
        // Both map to "appendicitis", so the labels agree exactly.
        assert_eq!(report.consistent_ids, vec!["1".to_string()]);
        assert_eq!(report.inconsistent_ids, vec!["2".to_string()]);
        assert_eq!(report.consistency_rate(), Some(0.5));
    }

    #[test]
    fn test_compare_models_needs_two() {
        let rules = clinical_rule_table();
        let mapper = Mapper::new(&rules, &NoNegation);
        let embedder = LabelEmbedder;
        let comparator = Comparator::new(&embedder);

        let models = vec![ModelPredictions {
            model: "only".into(),
            predictions: prediction_map(&[("1", "Final Diagnosis: Pneumonia")]),
        }];
        let report = compare_models(&models, &comparator, &mapper);
        assert_eq!(report.total(), 0);
        assert!(report.consistency_rate().is_none());
    }
}
