//! Procedure presence checks across the three code representations.

use serde::{Deserialize, Serialize};

use super::{contains_word, KeywordChecker, NegationDetector};
use crate::models::{PathologyRule, PatientProcedures};

/// A clinical procedure described by its ICD-9 codes, ICD-10 codes, and
/// free-text keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureTarget {
    pub icd9: Vec<String>,
    pub icd10: Vec<String>,
    pub keywords: Vec<String>,
}

impl ProcedureTarget {
    pub fn new(icd9: &[&str], icd10: &[&str], keywords: &[&str]) -> Self {
        Self {
            icd9: icd9.iter().map(|c| c.to_string()).collect(),
            icd10: icd10.iter().map(|c| c.to_string()).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Normalize an ICD code for comparison: trim, uppercase, drop periods.
fn normalize_code(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| *c != '.')
        .collect::<String>()
        .to_uppercase()
}

fn codes_intersect(target: &[String], patient: &[String]) -> bool {
    if target.is_empty() || patient.is_empty() {
        return false;
    }
    patient.iter().any(|pc| {
        let pc = normalize_code(pc);
        target.iter().any(|tc| normalize_code(tc) == pc)
    })
}

/// True when the patient record shows the target procedure in any of the
/// three representations: ICD-9 intersection, ICD-10 intersection, or a
/// keyword occurring whole-word in a discharge procedure line.
///
/// The OR is deliberate: no single representation is reliable, and a false
/// positive at this coarse screening layer is preferred over a false
/// negative. Absence is a valid boolean outcome, never an error.
pub fn has_procedure(target: &ProcedureTarget, patient: &PatientProcedures) -> bool {
    if codes_intersect(&target.icd9, &patient.icd9) {
        return true;
    }
    if codes_intersect(&target.icd10, &patient.icd10) {
        return true;
    }
    target.keywords.iter().any(|kw| {
        patient
            .discharge
            .iter()
            .any(|line| contains_word(line, kw))
    })
}

/// Apply a location/modifier rule to free treatment narrative, with negation
/// screening. Used for treatments that are narrated rather than coded
/// ("the appendix was surgically removed").
pub fn rule_in_text(
    rule: &PathologyRule,
    text: &str,
    detector: &dyn NegationDetector,
) -> bool {
    let checker = KeywordChecker::new(detector);
    if !checker.is_positive(text, &rule.location) {
        return false;
    }
    if rule.modifiers.is_empty() {
        return true;
    }
    rule.modifiers
        .iter()
        .any(|modifier| checker.is_positive(text, modifier))
}
