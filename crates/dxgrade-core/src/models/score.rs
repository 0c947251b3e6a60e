//! Score records produced by the per-pathology scoring engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named group of laboratory tests required for one diagnostic workup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabCategory {
    pub name: &'static str,
    pub tests: Vec<u32>,
}

impl LabCategory {
    pub fn new(name: &'static str, tests: Vec<u32>) -> Self {
        Self { name, tests }
    }
}

/// Per-treatment reconciliation of requested against required flags.
///
/// This is the single explicit comparison contract between the two boolean
/// maps: a treatment matches when requested equals required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentReconciliation {
    /// Treatment name to whether requested == required.
    pub per_treatment: BTreeMap<String, bool>,
    pub matched: usize,
    pub total: usize,
}

impl TreatmentReconciliation {
    pub fn from_maps(
        requested: &BTreeMap<String, bool>,
        required: &BTreeMap<String, bool>,
    ) -> Self {
        let per_treatment: BTreeMap<String, bool> = required
            .iter()
            .map(|(name, req)| {
                let got = requested.get(name).copied().unwrap_or(false);
                (name.clone(), got == *req)
            })
            .collect();
        let matched = per_treatment.values().filter(|m| **m).count();
        let total = per_treatment.len();
        Self {
            per_treatment,
            matched,
            total,
        }
    }

    /// Fraction of treatments whose requested flag equals the required flag.
    pub fn concordance(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }

    pub fn fully_concordant(&self) -> bool {
        self.matched == self.total
    }
}

/// A single exported dimension value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Score(f64),
    Flag(bool),
}

/// The multi-dimensional score for one case under one pathology rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// 1.0 when a strict rule, regex pattern, or fuzzy name match fired.
    pub diagnosis: f64,
    /// 1.0 only when a lenient rule fired and no strict match did.
    pub gracious_diagnosis: f64,
    /// Highest imaging tier reached; monotonically non-decreasing within a
    /// case.
    pub imaging: f64,
    /// Per required category, the test ids observed in the case's labs.
    pub correct_labs: BTreeMap<String, Vec<u32>>,
    /// Observed tests from the neutral panels; reported, never scored.
    pub neutral_labs: Vec<u32>,
    pub treatment_requested: BTreeMap<String, bool>,
    pub treatment_required: BTreeMap<String, bool>,
    pub treatment: TreatmentReconciliation,
}

impl ScoreRecord {
    /// Flatten to dimension-name/value pairs for export.
    pub fn dimensions(&self) -> BTreeMap<String, DimensionValue> {
        let mut out = BTreeMap::new();
        out.insert("Diagnosis".to_string(), DimensionValue::Score(self.diagnosis));
        out.insert(
            "Gracious Diagnosis".to_string(),
            DimensionValue::Score(self.gracious_diagnosis),
        );
        out.insert("Imaging".to_string(), DimensionValue::Score(self.imaging));
        for (category, observed) in &self.correct_labs {
            out.insert(
                category.clone(),
                DimensionValue::Score(observed.len() as f64),
            );
        }
        for (name, value) in &self.treatment_requested {
            out.insert(format!("{name} Requested"), DimensionValue::Flag(*value));
        }
        for (name, value) in &self.treatment_required {
            out.insert(format!("{name} Required"), DimensionValue::Flag(*value));
        }
        out
    }
}
