//! Per-procedure ICD-9/ICD-10 code lists and discharge-summary keywords.
//!
//! The same procedure may be coded in either ICD version or only narrated in
//! free text, so each target carries all three representations.

use crate::models::PathologyRule;
use crate::text::ProcedureTarget;

pub fn ercp() -> ProcedureTarget {
    ProcedureTarget::new(
        &[
            "8766", "5181", "5184", "5221", "5187", "5293", "5188", "5110", "5185", "8754",
            "5114", "9705",
        ],
        &[
            "0F798DZ", "0F798ZZ", "0F7D8DZ", "0FB98ZX", "0FBD8ZX", "0FC98ZZ", "0FD98ZX",
            "0FDG8ZX", "BF101ZZ", "BF10YZZ", "BF11YZZ", "BF141ZZ", "BF14YZZ", "0FJB8ZZ",
            "0FJD8ZZ",
        ],
        &[
            "biliary stent",
            "biliary cannulation",
            "ercp",
            "endoscopic retrograde cholangiography",
            "endoscopic retrograde cholangiopancreatography",
            "cholangiogram",
            "cbd stent",
            "pancreatic stent",
            "sphincterotomy",
            "sphinctertomy",
        ],
    )
}

pub fn appendectomy() -> ProcedureTarget {
    ProcedureTarget::new(
        &["4701", "4709"],
        &["0DTJ4ZZ", "0DTJ0ZZ"],
        &["appendectomy"],
    )
}

pub fn cholecystectomy() -> ProcedureTarget {
    ProcedureTarget::new(
        &["5123", "5122", "5121", "5102", "5124", "5103"],
        &["0FB44ZZ", "0FB40ZZ"],
        &[
            "cholecystectomy",
            // Misspellings seen in discharge summaries.
            "cholecystecotmy",
            "cholecsytectomy",
            "cholecystecomy",
            "cholecytectomy",
            "cholecyctectomy",
            "laparoscopic cholecystitis",
        ],
    )
}

pub fn colectomy() -> ProcedureTarget {
    ProcedureTarget::new(
        &[
            "4575", "4576", "4863", "4562", "4542", "4579", "4531", "4530", "4533", "1739",
            "1734", "1736", "4572", "4573", "1733", "4541", "1732", "5459", "5451", "4574",
            "9624",
        ],
        &[
            "0DBM8ZZ", "0DBH8ZZ", "0DB90ZZ", "0DB94ZZ", "0DBB0ZZ", "0DTK4ZZ", "0DTM4ZZ",
            "0DTL4ZZ", "0DTN4ZZ", "0DBG4ZZ", "0DTH0ZZ", "0DTF0ZZ", "0DTN0ZZ", "0DB80ZZ",
            "0DBA0ZZ", "0DB84ZZ", "0DBB4ZZ", "0DTF4ZZ", "0DBH0ZZ", "0DTH4ZZ", "0DNN0ZZ",
            "0DBM4ZZ", "0DTM0ZZ", "0DNB0ZZ", "0DBM0ZZ", "0DBE0ZZ", "0DBG0ZZ", "0DNE0ZZ",
            "0DNE4ZZ", "0DN90ZZ", "0DNL4ZZ", "0DNA0ZZ", "0DBH4ZZ", "0DTK0ZZ", "0DTL0ZZ",
            "0DNB4ZZ", "0DNL0ZZ", "0DNN4ZZ", "0DBA8ZZ", "0DBA4ZZ", "0DNB7ZZ", "0DBE4ZZ",
            "0DTNFZZ", "0DNA4ZZ", "0DN94ZZ", "0DB98ZZ", "0DTH8ZZ", "0DTN7ZZ", "0DBB3ZZ",
            "0DBN0ZZ", "0DBN4ZZ", "0DT80ZZ",
        ],
        &[
            "low anterior resection",
            "colectomy",
            "colonic resection",
            "colostomy",
            "resection of rectosigmoid colon",
            "resection of sigmoid colon",
            "rectosigmoid resection",
            "resection of colon",
            "sigmoidectomy",
            "sigmoid resection",
            "small bowel resection",
        ],
    )
}

pub fn drainage() -> ProcedureTarget {
    ProcedureTarget::new(
        &["5491"],
        &[
            "0W2JX0Z", "0W9J30Z", "0W9J3ZZ", "0W9J3ZX", "0W9G30Z", "0W9G3ZZ", "0W9G3ZX",
            // Hepatobiliary and pancreatic drainage.
            "0F2BX0Z", "0F9430Z", "0F9G30Z", "0F998ZZ", "0F998ZX",
        ],
        &["drain", "pigtail", "catheter", "aspiration"],
    )
}

pub fn pneumonia_airway_procedures() -> ProcedureTarget {
    ProcedureTarget::new(
        &["9671", "9672", "3328", "3329", "9402", "8954", "3350"],
        &[
            "5A1935Z", "5A1945Z", "5A1955Z", "0BJH4ZZ", "0BJ08ZZ", "0B9G3ZX", "3E1G78Z",
            "6A4Z0ZZ", "5A09357", "XW03325",
        ],
        &[
            "mechanical ventilation",
            "bronchoscopy",
            "thoracentesis",
            "chest tube",
            "nebulizer",
            "cpap",
            "bipap",
            "hfnc",
            "intubation",
            "tracheostomy",
            "lavage",
        ],
    )
}

pub fn pericardiocentesis() -> ProcedureTarget {
    ProcedureTarget::new(
        &["370", "3700", "3701"],
        &["02H73DZ", "02H73KZ", "0W8D3ZZ"],
        &[
            "pericardiocentesis",
            "pericardial tap",
            "pericardial aspiration",
            "pericardial drainage",
            "pericardio-centesis",
            "echo-guided pericardiocentesis",
        ],
    )
}

pub fn pericardiectomy() -> ProcedureTarget {
    ProcedureTarget::new(
        &["375", "3751", "3752"],
        &["02H70ZZ", "02H73ZZ", "02H74ZZ"],
        &[
            "pericardiectomy",
            "pericardial stripping",
            "pericardial resection",
            "pericardial window",
            "pericardio-peritoneal window",
        ],
    )
}

/// Treatment-narrative keyword lists.
pub const ANTIBIOTIC_KEYWORDS: &[&str] = &[
    "azithromycin",
    "ceftriaxone",
    "levofloxacin",
    "moxifloxacin",
    "piperacillin",
    "vancomycin",
    "amoxicillin",
    "clavulanate",
    "macrolide",
    "cephalosporin",
];

pub const VENTILATION_KEYWORDS: &[&str] = &[
    "ventilator",
    "peep",
    "fio2",
    "tidal volume",
    "vent mode",
    "weaning protocol",
];

pub const OXYGEN_THERAPY_KEYWORDS: &[&str] = &[
    "nasal cannula",
    "face mask",
    "non-rebreather",
    "venturi mask",
    "high flow",
    "spo2",
    "oxygen titration",
];

pub const ANTI_INFLAMMATORY_KEYWORDS: &[&str] = &[
    "ibuprofen",
    "aspirin",
    "indomethacin",
    "naproxen",
    "nsaid",
    "nonsteroidal",
];

pub const COLCHICINE_KEYWORDS: &[&str] = &["colchicine", "colcrys", "colchicum"];

pub const CORTICOSTEROID_KEYWORDS: &[&str] = &[
    "prednisone",
    "methylprednisolone",
    "corticosteroid",
    "dexamethasone",
    "steroid therapy",
];

pub const ANTICOAGULATION_KEYWORDS: &[&str] = &[
    "anticoagulation",
    "anticoagulant",
    "heparin",
    "enoxaparin",
    "warfarin",
    "apixaban",
    "rivaroxaban",
];

pub const THROMBOLYSIS_KEYWORDS: &[&str] = &[
    "thrombolysis",
    "thrombolytic",
    "alteplase",
    "tenecteplase",
    "tpa",
];

pub const EMBOLECTOMY_KEYWORDS: &[&str] = &["embolectomy", "thrombectomy"];

/// Alternative narrated-procedure rules, applied to treatment free text when
/// no code or direct keyword is present.
pub fn alternate_appendectomy_rules() -> Vec<PathologyRule> {
    vec![PathologyRule::new(
        "appendix",
        &["surgery", "surgical", "removal", "remove"],
    )]
}

pub fn alternate_cholecystectomy_rules() -> Vec<PathologyRule> {
    vec![PathologyRule::new(
        "gallbladder",
        &["surgery", "surgical", "removal", "remove"],
    )]
}

pub fn alternate_colectomy_rules() -> Vec<PathologyRule> {
    vec![PathologyRule::new(
        "colon",
        &["surgery", "surgical", "removal", "remove"],
    )]
}

const DRAINAGE_MODIFIERS: &[&str] = &["drain", "drainage", "pigtail", "catheter", "aspiration"];

pub fn alternate_drainage_rules_diverticulitis() -> Vec<PathologyRule> {
    [
        "abscess",
        "abdominal",
        "pelvic",
        "peritoneal",
        "pericolonic",
        "sigmoid",
        "diverticular",
        "pararectal",
    ]
    .iter()
    .map(|loc| PathologyRule::new(loc, DRAINAGE_MODIFIERS))
    .collect()
}

pub fn alternate_drainage_rules_pancreatitis() -> Vec<PathologyRule> {
    [
        "abscess",
        "abdominal",
        "pelvic",
        "peritoneal",
        "pancreatic",
        "gallbladder",
        "biliary",
        "bile duct",
        "perirectal",
    ]
    .iter()
    .map(|loc| PathologyRule::new(loc, DRAINAGE_MODIFIERS))
    .collect()
}

pub fn alternate_pneumonia_rules() -> Vec<PathologyRule> {
    vec![
        PathologyRule::new("lung", &["drainage", "aspiration", "suction"]),
        PathologyRule::new("pleural", &["tap", "drain", "effusion"]),
        PathologyRule::new("respiratory", &["support", "failure", "distress"]),
        PathologyRule::new("alveolar", &["infiltrate", "consolidation"]),
    ]
}

pub fn alternate_pericardiocentesis_rules() -> Vec<PathologyRule> {
    vec![
        PathologyRule::new("pericardium", &["drainage", "aspiration", "tap", "catheter"]),
        PathologyRule::new("heart sac", &["fluid removal", "puncture"]),
    ]
}

pub fn alternate_pericardiectomy_rules() -> Vec<PathologyRule> {
    vec![
        PathologyRule::new("pericardium", &["surgery", "removal", "resection", "strip"]),
        PathologyRule::new("heart", &["constriction release", "decompression"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientProcedures;
    use crate::text::has_procedure;

    #[test]
    fn test_targets_carry_all_three_representations() {
        for target in [
            ercp(),
            appendectomy(),
            cholecystectomy(),
            colectomy(),
            drainage(),
            pneumonia_airway_procedures(),
            pericardiocentesis(),
            pericardiectomy(),
        ] {
            assert!(!target.icd9.is_empty());
            assert!(!target.icd10.is_empty());
            assert!(!target.keywords.is_empty());
        }
    }

    #[test]
    fn test_appendectomy_lookup() {
        let patient = PatientProcedures {
            icd9: vec![],
            icd10: vec!["0DTJ4ZZ".into()],
            discharge: vec![],
        };
        assert!(has_procedure(&appendectomy(), &patient));
    }
}
