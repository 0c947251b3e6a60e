//! Pneumonia rubric.

use crate::models::{Case, LabCategory, Pathology};
use crate::tables::{
    alternate_pneumonia_rules, neutral_tests, pneumonia_airway_procedures, ANTIBIOTIC_KEYWORDS,
    BLOOD_CULTURE, BLOOD_GAS_PCO2, BLOOD_GAS_PH, BLOOD_GAS_PO2, BLOOD_GAS_POTASSIUM, CBC_PANEL,
    INFLAMMATION_LAB_TESTS, LIVER_PANEL, OXYGEN_THERAPY_KEYWORDS, PROCALCITONIN, RENAL_PANEL,
    SPUTUM_CULTURE, URINALYSIS_PANEL, VENTILATION_KEYWORDS,
};
use crate::text::{has_procedure, rule_in_text, KeywordChecker};

use super::{PathologyRubric, TreatmentFlags};

const TREATMENTS: &[(&'static str, bool)] = &[
    ("Antibiotics", true),
    ("Ventilation", false),
    ("Oxygen Therapy", true),
    ("Support", true),
];

pub struct PneumoniaRubric {
    required_labs: Vec<LabCategory>,
    neutral_labs: Vec<u32>,
}

impl Default for PneumoniaRubric {
    fn default() -> Self {
        Self::new()
    }
}

impl PneumoniaRubric {
    pub fn new() -> Self {
        let mut inflammation = INFLAMMATION_LAB_TESTS.to_vec();
        inflammation.push(PROCALCITONIN);
        let required_labs = vec![
            LabCategory::new("Inflammation", inflammation),
            LabCategory::new(
                "Microbiology",
                vec![SPUTUM_CULTURE, BLOOD_CULTURE, PROCALCITONIN],
            ),
            LabCategory::new(
                "Gas Analysis",
                vec![
                    BLOOD_GAS_PCO2,
                    BLOOD_GAS_PH,
                    BLOOD_GAS_PO2,
                    BLOOD_GAS_POTASSIUM,
                ],
            ),
        ];

        let required_refs: Vec<&[u32]> =
            required_labs.iter().map(|c| c.tests.as_slice()).collect();
        let neutral_labs = neutral_tests(
            &[CBC_PANEL, LIVER_PANEL, RENAL_PANEL, URINALYSIS_PANEL],
            &required_refs,
        );

        Self {
            required_labs,
            neutral_labs,
        }
    }
}

impl PathologyRubric for PneumoniaRubric {
    fn pathology(&self) -> Pathology {
        Pathology::Pneumonia
    }

    fn imaging_tier(&self, modality: &str) -> Option<f64> {
        // CT is preferred but a chest radiograph is accepted.
        match modality {
            "CT" => Some(2.0),
            "Radiograph" => Some(1.0),
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
            || alternate_pneumonia_rules()
                .iter()
                .any(|rule| rule_in_text(rule, &case.treatment_text, checker.detector()))
        {
            flags.request("Antibiotics");
        }

        if case
            .procedures
            .discharge
            .iter()
            .any(|line| checker.any_positive(line, VENTILATION_KEYWORDS))
            || has_procedure(&pneumonia_airway_procedures(), &case.procedures)
            || checker.is_positive(&case.treatment_text, "ventilation|ventilator|intubation")
        {
            flags.request("Ventilation");
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

        if checker.is_positive(&case.treatment_text, "fluid|pain|respiratory") {
            flags.request("Support");
        }

        // Frank respiratory failure makes ventilatory support mandatory.
        if checker.is_positive(
            &case.discharge_diagnosis,
            "respiratory failure|intubated|mechanical ventilation",
        ) {
            flags.require("Ventilation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientProcedures;
    use crate::text::NoNegation;

    fn run_treatment(case: &Case) -> TreatmentFlags {
        let rubric = PneumoniaRubric::new();
        let checker = KeywordChecker::new(&NoNegation);
        let mut flags = TreatmentFlags::from_defaults(rubric.treatments());
        rubric.score_treatment(case, &checker, &mut flags);
        flags
    }

    #[test]
    fn test_named_antibiotic_counts() {
        let mut case = Case::new("100001", "Final Diagnosis: Community acquired pneumonia");
        case.treatment_text = "Ceftriaxone and azithromycin".into();
        let flags = run_treatment(&case);
        assert!(flags.requested["Antibiotics"]);
    }

    #[test]
    fn test_ventilation_from_discharge_procedures() {
        let mut case = Case::new("100002", "Final Diagnosis: Pneumonia");
        case.procedures = PatientProcedures {
            icd9: vec![],
            icd10: vec![],
            discharge: vec!["Ventilator support, PEEP 8".into()],
        };
        let flags = run_treatment(&case);
        assert!(flags.requested["Ventilation"]);
    }

    #[test]
    fn test_respiratory_failure_requires_ventilation() {
        let mut case = Case::new("100003", "Final Diagnosis: Pneumonia");
        case.discharge_diagnosis = "Pneumonia with acute hypoxemic respiratory failure".into();
        let flags = run_treatment(&case);
        assert!(flags.required["Ventilation"]);
    }

    #[test]
    fn test_procalcitonin_counts_for_two_categories() {
        let rubric = PneumoniaRubric::new();
        let categories: Vec<&str> = rubric
            .required_labs()
            .iter()
            .filter(|c| c.tests.contains(&PROCALCITONIN))
            .map(|c| c.name)
            .collect();
        assert_eq!(categories, vec!["Inflammation", "Microbiology"]);
    }
}
