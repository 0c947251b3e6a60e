//! Pulmonary embolism rubric.

use crate::models::{Case, LabCategory, Pathology};
use crate::tables::{
    neutral_tests, ANTICOAGULATION_KEYWORDS, CBC_PANEL, D_DIMER, EMBOLECTOMY_KEYWORDS,
    FIBRINOGEN, INFLAMMATION_LAB_TESTS, INR, OXYGEN_THERAPY_KEYWORDS, PT, PTT, RENAL_PANEL,
    THROMBOLYSIS_KEYWORDS,
};
use crate::text::KeywordChecker;

use super::{PathologyRubric, TreatmentFlags};

const TREATMENTS: &[(&'static str, bool)] = &[
    ("Anticoagulation", true),
    ("Thrombolysis", false),
    ("Embolectomy", false),
    ("Oxygen Therapy", true),
    ("Support", true),
];

pub struct PulmonaryEmbolismRubric {
    required_labs: Vec<LabCategory>,
    neutral_labs: Vec<u32>,
}

impl Default for PulmonaryEmbolismRubric {
    fn default() -> Self {
        Self::new()
    }
}

impl PulmonaryEmbolismRubric {
    pub fn new() -> Self {
        let required_labs = vec![
            LabCategory::new("Inflammation", INFLAMMATION_LAB_TESTS.to_vec()),
            LabCategory::new("Coagulation", vec![D_DIMER, FIBRINOGEN, PT, PTT, INR]),
        ];

        let required_refs: Vec<&[u32]> =
            required_labs.iter().map(|c| c.tests.as_slice()).collect();
        let neutral_labs = neutral_tests(&[CBC_PANEL, RENAL_PANEL], &required_refs);

        Self {
            required_labs,
            neutral_labs,
        }
    }

    /// Hemodynamic instability marks a high-risk case.
    fn is_high_risk_case(&self, case: &Case, checker: &KeywordChecker<'_>) -> bool {
        checker.is_positive(
            &case.discharge_diagnosis,
            "hypotension|cardiac arrest|shock|hemodynamic instability|hemodynamically unstable",
        )
    }
}

impl PathologyRubric for PulmonaryEmbolismRubric {
    fn pathology(&self) -> Pathology {
        Pathology::PulmonaryEmbolism
    }

    fn imaging_tier(&self, modality: &str) -> Option<f64> {
        match modality {
            "CT Pulmonary Angiography" => Some(2.0),
            "V/Q Scan" => Some(1.0),
            "Echocardiogram" => Some(0.5),
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
        if checker.any_positive(&case.treatment_text, ANTICOAGULATION_KEYWORDS) {
            flags.request("Anticoagulation");
        }

        if checker.any_positive(&case.treatment_text, THROMBOLYSIS_KEYWORDS) {
            flags.request("Thrombolysis");
        }

        if checker.any_positive(&case.treatment_text, EMBOLECTOMY_KEYWORDS)
            || case
                .procedures
                .discharge
                .iter()
                .any(|line| checker.any_positive(line, EMBOLECTOMY_KEYWORDS))
        {
            flags.request("Embolectomy");
        }

        if case
            .procedures
            .discharge
            .iter()
            .any(|line| checker.any_positive(line, OXYGEN_THERAPY_KEYWORDS))
            || checker.is_positive(&case.treatment_text, "oxygen")
        {
            flags.request("Oxygen Therapy");
        }

        if checker.is_positive(&case.treatment_text, "fluid|analgesia|analgesic|hemodynamic") {
            flags.request("Support");
        }

        if self.is_high_risk_case(case, checker) {
            flags.require("Thrombolysis");
            flags.require("Embolectomy");
        }
    }
}
