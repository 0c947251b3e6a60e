//! Appendicitis rubric.

use crate::models::{Case, LabCategory, Pathology};
use crate::tables::{
    alternate_appendectomy_rules, appendectomy, drainage, neutral_tests, ANTIBIOTIC_KEYWORDS,
    CBC_PANEL, CRP, INFLAMMATION_LAB_TESTS, RENAL_PANEL, URINALYSIS_PANEL,
};
use crate::text::{has_procedure, rule_in_text, KeywordChecker};

use super::{PathologyRubric, TreatmentFlags};

const TREATMENTS: &[(&'static str, bool)] = &[
    ("Appendectomy", true),
    ("Antibiotics", true),
    ("Drainage", false),
    ("Support", true),
];

pub struct AppendicitisRubric {
    required_labs: Vec<LabCategory>,
    neutral_labs: Vec<u32>,
}

impl Default for AppendicitisRubric {
    fn default() -> Self {
        Self::new()
    }
}

impl AppendicitisRubric {
    pub fn new() -> Self {
        let mut inflammation = INFLAMMATION_LAB_TESTS.to_vec();
        inflammation.push(CRP);
        let required_labs = vec![LabCategory::new("Inflammation", inflammation)];

        let required_refs: Vec<&[u32]> =
            required_labs.iter().map(|c| c.tests.as_slice()).collect();
        let neutral_labs = neutral_tests(
            &[CBC_PANEL, RENAL_PANEL, URINALYSIS_PANEL],
            &required_refs,
        );

        Self {
            required_labs,
            neutral_labs,
        }
    }
}

impl PathologyRubric for AppendicitisRubric {
    fn pathology(&self) -> Pathology {
        Pathology::Appendicitis
    }

    fn imaging_tier(&self, modality: &str) -> Option<f64> {
        // CT is first-line; ultrasound and MRI are accepted alternatives.
        match modality {
            "CT" => Some(2.0),
            "Ultrasound" | "MRI" => Some(1.0),
            _ => None,
        }
    }

    fn required_labs(&self) -> &[LabCategory] {
        &self.required_labs
    }

    fn neutral_labs(&self) -> &[u32] {
        &self.neutral_labs
    }

    fn treatments(&self) -> &[(&'static str, bool)] {
        TREATMENTS
    }

    fn score_treatment(
        &self,
        case: &Case,
        checker: &KeywordChecker<'_>,
        flags: &mut TreatmentFlags,
    ) {
        if has_procedure(&appendectomy(), &case.procedures)
            || alternate_appendectomy_rules()
                .iter()
                .any(|rule| rule_in_text(rule, &case.treatment_text, checker.detector()))
        {
            flags.request("Appendectomy");
        }

        if checker.is_positive(&case.treatment_text, "antibiotic|antibiotics")
            || checker.any_positive(&case.treatment_text, ANTIBIOTIC_KEYWORDS)
        {
            flags.request("Antibiotics");
        }

        if has_procedure(&drainage(), &case.procedures) {
            flags.request("Drainage");
        }

        if checker.is_positive(&case.treatment_text, "fluid|pain|analgesia|analgesic") {
            flags.request("Support");
        }

        // A periappendiceal abscess or perforation makes drainage mandatory.
        if checker.is_positive(&case.discharge_diagnosis, "abscess|perforation|perforated") {
            flags.require("Drainage");
        }
    }
}
