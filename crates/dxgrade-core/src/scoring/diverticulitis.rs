//! Diverticulitis rubric.

use crate::models::{Case, LabCategory, Pathology};
use crate::tables::{
    alternate_colectomy_rules, alternate_drainage_rules_diverticulitis, colectomy, drainage,
    neutral_tests, ANTIBIOTIC_KEYWORDS, CBC_PANEL, CRP, INFLAMMATION_LAB_TESTS, RENAL_PANEL,
    URINALYSIS_PANEL,
};
use crate::text::{has_procedure, rule_in_text, KeywordChecker};

use super::{PathologyRubric, TreatmentFlags};

const TREATMENTS: &[(&'static str, bool)] = &[
    ("Antibiotics", true),
    ("Colectomy", false),
    ("Drainage", false),
    ("Support", true),
];

pub struct DiverticulitisRubric {
    required_labs: Vec<LabCategory>,
    neutral_labs: Vec<u32>,
}

impl Default for DiverticulitisRubric {
    fn default() -> Self {
        Self::new()
    }
}

impl DiverticulitisRubric {
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

impl PathologyRubric for DiverticulitisRubric {
    fn pathology(&self) -> Pathology {
        Pathology::Diverticulitis
    }

    fn imaging_tier(&self, modality: &str) -> Option<f64> {
        match modality {
            "CT" => Some(2.0),
            "Ultrasound" | "MRI" => Some(1.0),
            "Radiograph" => Some(0.5),
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
        if checker.is_positive(&case.treatment_text, "antibiotic|antibiotics")
            || checker.any_positive(&case.treatment_text, ANTIBIOTIC_KEYWORDS)
        {
            flags.request("Antibiotics");
        }

        if has_procedure(&colectomy(), &case.procedures)
            || alternate_colectomy_rules()
                .iter()
                .any(|rule| rule_in_text(rule, &case.treatment_text, checker.detector()))
        {
            flags.request("Colectomy");
        }

        if has_procedure(&drainage(), &case.procedures)
            || alternate_drainage_rules_diverticulitis()
                .iter()
                .any(|rule| rule_in_text(rule, &case.treatment_text, checker.detector()))
        {
            flags.request("Drainage");
        }

        if checker.is_positive(&case.treatment_text, "fluid|pain|analgesia|bowel rest") {
            flags.request("Support");
        }

        // Free perforation mandates resection; a contained abscess mandates
        // percutaneous drainage.
        if checker.is_positive(&case.discharge_diagnosis, "perforation|perforated") {
            flags.require("Colectomy");
        }
        if checker.is_positive(&case.discharge_diagnosis, "abscess") {
            flags.require("Drainage");
        }
    }
}
