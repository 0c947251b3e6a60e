//! Per-patient case records consumed by the scoring engine.

use serde::{Deserialize, Serialize};

use crate::models::Region;

/// One performed laboratory test, in the order it was drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    /// Laboratory item identifier (MIMIC itemid convention).
    pub item_id: u32,
    /// Reported value, kept as free text.
    pub value: String,
}

/// One imaging study recorded for the admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagingObservation {
    pub region: Region,
    /// Modality label, e.g. "CT", "Ultrasound", "Echocardiogram".
    pub modality: String,
}

/// The three parallel representations of performed procedures.
///
/// The same clinical procedure may be coded in either ICD version or only
/// narrated in the discharge summary, so all three are carried and checks
/// OR across them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProcedures {
    pub icd9: Vec<String>,
    pub icd10: Vec<String>,
    /// Free-text procedure lines from the discharge summary.
    pub discharge: Vec<String>,
}

/// Immutable record for one patient admission, used for one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Admission identifier supplied by the caller.
    pub case_id: String,
    /// Raw model completion holding the candidate diagnosis.
    pub prediction: String,
    /// Originating free-text context for negation checks. Empty means the
    /// prediction itself is the context.
    pub context: String,
    /// The model's treatment narrative, if it produced one.
    pub treatment_text: String,
    /// Reference discharge diagnosis, used by severity predicates.
    pub discharge_diagnosis: String,
    /// Performed lab tests, ordered as drawn.
    pub labs: Vec<LabResult>,
    pub imaging: Vec<ImagingObservation>,
    pub procedures: PatientProcedures,
}

impl Case {
    pub fn new(case_id: impl Into<String>, prediction: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            prediction: prediction.into(),
            context: String::new(),
            treatment_text: String::new(),
            discharge_diagnosis: String::new(),
            labs: Vec::new(),
            imaging: Vec::new(),
            procedures: PatientProcedures::default(),
        }
    }

    /// Negation context: the supplied free text, or the prediction when none
    /// was given.
    pub fn context_text(&self) -> &str {
        if self.context.trim().is_empty() {
            &self.prediction
        } else {
            &self.context
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_falls_back_to_prediction() {
        let case = Case::new("100001", "Final Diagnosis: Acute appendicitis");
        assert_eq!(case.context_text(), "Final Diagnosis: Acute appendicitis");

        let mut with_context = case.clone();
        with_context.context = "Patient presented with RLQ pain.".into();
        assert_eq!(with_context.context_text(), "Patient presented with RLQ pain.");
    }
}
