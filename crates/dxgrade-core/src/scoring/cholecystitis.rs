//! Cholecystitis rubric.

use crate::models::{Case, LabCategory, Pathology};
use crate::tables::{
    alternate_cholecystectomy_rules, cholecystectomy, drainage, ercp, neutral_tests,
    ANTIBIOTIC_KEYWORDS, CBC_PANEL, CRP, INFLAMMATION_LAB_TESTS, LIVER_PANEL, RENAL_PANEL,
};
use crate::text::{has_procedure, rule_in_text, KeywordChecker};

use super::{PathologyRubric, TreatmentFlags};

const TREATMENTS: &[(&'static str, bool)] = &[
    ("Cholecystectomy", true),
    ("Antibiotics", true),
    ("ERCP", false),
    ("Drainage", false),
    ("Support", true),
];

pub struct CholecystitisRubric {
    required_labs: Vec<LabCategory>,
    neutral_labs: Vec<u32>,
}

impl Default for CholecystitisRubric {
    fn default() -> Self {
        Self::new()
    }
}

impl CholecystitisRubric {
    pub fn new() -> Self {
        let mut inflammation = INFLAMMATION_LAB_TESTS.to_vec();
        inflammation.push(CRP);
        let required_labs = vec![
            LabCategory::new("Inflammation", inflammation),
            LabCategory::new(
                "Liver",
                vec![
                    50861, // ALT
                    50878, // AST
                    50863, // Alkaline Phosphatase
                    50885, // Bilirubin, Total
                    50884, // Bilirubin, Direct
                    50883, // Bilirubin, Indirect
                ],
            ),
        ];

        let required_refs: Vec<&[u32]> =
            required_labs.iter().map(|c| c.tests.as_slice()).collect();
        let neutral_labs = neutral_tests(&[CBC_PANEL, RENAL_PANEL, LIVER_PANEL], &required_refs);

        Self {
            required_labs,
            neutral_labs,
        }
    }
}

impl PathologyRubric for CholecystitisRubric {
    fn pathology(&self) -> Pathology {
        Pathology::Cholecystitis
    }

    fn imaging_tier(&self, modality: &str) -> Option<f64> {
        // Right-upper-quadrant ultrasound is the first-line study.
        match modality {
            "Ultrasound" => Some(2.0),
            "CT" | "MRI" => Some(1.0),
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
        if has_procedure(&cholecystectomy(), &case.procedures)
            || alternate_cholecystectomy_rules()
                .iter()
                .any(|rule| rule_in_text(rule, &case.treatment_text, checker.detector()))
        {
            flags.request("Cholecystectomy");
        }

        if checker.is_positive(&case.treatment_text, "antibiotic|antibiotics")
            || checker.any_positive(&case.treatment_text, ANTIBIOTIC_KEYWORDS)
        {
            flags.request("Antibiotics");
        }

        if has_procedure(&ercp(), &case.procedures)
            || checker.is_positive(&case.treatment_text, "ercp|sphincterotomy")
        {
            flags.request("ERCP");
        }

        if has_procedure(&drainage(), &case.procedures)
            || checker.is_positive(&case.treatment_text, "cholecystostomy")
        {
            flags.request("Drainage");
        }

        if checker.is_positive(&case.treatment_text, "fluid|pain|analgesia|analgesic") {
            flags.request("Support");
        }

        // Concurrent duct obstruction makes ERCP mandatory.
        if checker.is_positive(
            &case.discharge_diagnosis,
            "choledocholithiasis|cholangitis|biliary obstruction",
        ) {
            flags.require("ERCP");
        }
    }
}
