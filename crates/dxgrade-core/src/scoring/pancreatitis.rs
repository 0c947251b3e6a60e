//! Pancreatitis rubric.

use crate::models::{Case, LabCategory, Pathology};
use crate::tables::{
    alternate_drainage_rules_pancreatitis, drainage, ercp, neutral_tests, AMYLASE,
    ANTIBIOTIC_KEYWORDS, CBC_PANEL, CRP, INFLAMMATION_LAB_TESTS, LIPASE, LIVER_PANEL,
    RENAL_PANEL,
};
use crate::text::{has_procedure, rule_in_text, KeywordChecker};

use super::{PathologyRubric, TreatmentFlags};

const TREATMENTS: &[(&'static str, bool)] = &[
    ("Fluid Resuscitation", true),
    ("Analgesia", true),
    ("Antibiotics", false),
    ("ERCP", false),
    ("Drainage", false),
];

pub struct PancreatitisRubric {
    required_labs: Vec<LabCategory>,
    neutral_labs: Vec<u32>,
}

impl Default for PancreatitisRubric {
    fn default() -> Self {
        Self::new()
    }
}

impl PancreatitisRubric {
    pub fn new() -> Self {
        let mut inflammation = INFLAMMATION_LAB_TESTS.to_vec();
        inflammation.push(CRP);
        let required_labs = vec![
            LabCategory::new("Inflammation", inflammation),
            LabCategory::new("Pancreas", vec![AMYLASE, LIPASE]),
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

impl PathologyRubric for PancreatitisRubric {
    fn pathology(&self) -> Pathology {
        Pathology::Pancreatitis
    }

    fn imaging_tier(&self, modality: &str) -> Option<f64> {
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
        if checker.is_positive(
            &case.treatment_text,
            "fluid|hydration|crystalloid|lactated ringer",
        ) {
            flags.request("Fluid Resuscitation");
        }

        if checker.is_positive(&case.treatment_text, "pain|analgesia|analgesic|opioid|morphine")
        {
            flags.request("Analgesia");
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
            || alternate_drainage_rules_pancreatitis()
                .iter()
                .any(|rule| rule_in_text(rule, &case.treatment_text, checker.detector()))
        {
            flags.request("Drainage");
        }

        // Antibiotics are reserved for infected necrosis; biliary
        // obstruction mandates ERCP; necrosis or abscess mandates drainage.
        if checker.is_positive(&case.discharge_diagnosis, "infected necrosis") {
            flags.require("Antibiotics");
        }
        if checker.is_positive(
            &case.discharge_diagnosis,
            "gallstone|choledocholithiasis|cholangitis|biliary",
        ) {
            flags.require("ERCP");
        }
        if checker.is_positive(&case.discharge_diagnosis, "necrosis|necrotizing|abscess") {
            flags.require("Drainage");
        }
    }
}
