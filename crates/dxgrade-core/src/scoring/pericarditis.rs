//! Pericarditis rubric.

use crate::models::{Case, LabCategory, Pathology};
use crate::tables::{
    alternate_pericardiectomy_rules, alternate_pericardiocentesis_rules, neutral_tests,
    pericardiectomy, pericardiocentesis, ANTI_INFLAMMATORY_KEYWORDS, CBC_PANEL,
    COLCHICINE_KEYWORDS, CORTICOSTEROID_KEYWORDS, CRP, ESR, INFLAMMATION_LAB_TESTS, NTPROBNP,
    RENAL_PANEL, TROPONIN_T,
};
use crate::text::{has_procedure, rule_in_text, KeywordChecker};

use super::{PathologyRubric, TreatmentFlags};

const TREATMENTS: &[(&'static str, bool)] = &[
    ("AntiInflammatory", true),
    ("Colchicine", true),
    ("Corticosteroids", false),
    ("Pericardiocentesis", false),
    ("Pericardiectomy", false),
    ("Antibiotics", false),
];

pub struct PericarditisRubric {
    required_labs: Vec<LabCategory>,
    neutral_labs: Vec<u32>,
}

impl Default for PericarditisRubric {
    fn default() -> Self {
        Self::new()
    }
}

impl PericarditisRubric {
    pub fn new() -> Self {
        let mut inflammation = INFLAMMATION_LAB_TESTS.to_vec();
        inflammation.push(CRP);
        inflammation.push(ESR);
        let required_labs = vec![
            LabCategory::new("Inflammation", inflammation),
            LabCategory::new("Cardiac Damage", vec![TROPONIN_T, NTPROBNP]),
        ];

        let required_refs: Vec<&[u32]> =
            required_labs.iter().map(|c| c.tests.as_slice()).collect();
        let neutral_labs = neutral_tests(&[CBC_PANEL, RENAL_PANEL], &required_refs);

        Self {
            required_labs,
            neutral_labs,
        }
    }

    fn is_infectious_case(&self, case: &Case, checker: &KeywordChecker<'_>) -> bool {
        checker.is_positive(
            &case.discharge_diagnosis,
            "purulent|bacterial|tuberculous|infectious",
        )
    }

    fn has_tamponade(&self, case: &Case, checker: &KeywordChecker<'_>) -> bool {
        checker.is_positive(&case.discharge_diagnosis, "tamponade")
    }

    fn is_recurrent_case(&self, case: &Case, checker: &KeywordChecker<'_>) -> bool {
        checker.is_positive(&case.discharge_diagnosis, "recurrent|relapsing")
    }
}

impl PathologyRubric for PericarditisRubric {
    fn pathology(&self) -> Pathology {
        Pathology::Pericarditis
    }

    fn imaging_tier(&self, modality: &str) -> Option<f64> {
        // Echocardiography is the reference standard; CT/MRI for complex
        // cases; plain films have low sensitivity.
        match modality {
            "Echocardiogram" => Some(2.0),
            "CT" | "MRI" => Some(1.0),
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
        if checker.is_positive(&case.treatment_text, "nsaid|ibuprofen|aspirin")
            || checker.any_positive(&case.treatment_text, ANTI_INFLAMMATORY_KEYWORDS)
        {
            flags.request("AntiInflammatory");
        }

        if checker.any_positive(&case.treatment_text, COLCHICINE_KEYWORDS) {
            flags.request("Colchicine");
        }

        if checker.any_positive(&case.treatment_text, CORTICOSTEROID_KEYWORDS) {
            flags.request("Corticosteroids");
        }

        if has_procedure(&pericardiocentesis(), &case.procedures)
            || alternate_pericardiocentesis_rules()
                .iter()
                .any(|rule| rule_in_text(rule, &case.treatment_text, checker.detector()))
        {
            flags.request("Pericardiocentesis");
        }

        if has_procedure(&pericardiectomy(), &case.procedures)
            || alternate_pericardiectomy_rules()
                .iter()
                .any(|rule| rule_in_text(rule, &case.treatment_text, checker.detector()))
        {
            flags.request("Pericardiectomy");
        }

        if checker.is_positive(&case.treatment_text, "antibiotic|antibiotics")
            && self.is_infectious_case(case, checker)
        {
            flags.request("Antibiotics");
        }

        if self.has_tamponade(case, checker) {
            flags.require("Pericardiocentesis");
        }
        if self.is_recurrent_case(case, checker) {
            flags.require("Corticosteroids");
            flags.require("Pericardiectomy");
        }
    }
}
