//! Golden tests for extraction and canonical mapping.
//!
//! These run the full raw-completion → extract → map pipeline with the
//! rule-based negation detector, against known completions.

use dxgrade_core::{clinical_rule_table, Mapper, Pathology};
use dxgrade_nlp::NegexDetector;

/// Golden pipeline case.
struct GoldenCase {
    id: &'static str,
    raw: &'static str,
    expected: Option<Pathology>,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "appendicitis-basic",
            raw: "Final Diagnosis: Acute Appendicitis due to obstruction.",
            expected: Some(Pathology::Appendicitis),
        },
        GoldenCase {
            id: "appendicitis-misspelled",
            raw: "Final Diagnosis: Appendercitis",
            expected: Some(Pathology::Appendicitis),
        },
        GoldenCase {
            id: "cholecystitis-strict-rule",
            raw: "Final Diagnosis: Gangrenous gallbladder infection",
            expected: Some(Pathology::Cholecystitis),
        },
        GoldenCase {
            id: "cholecystitis-cholangitis",
            raw: "Final Diagnosis: Ascending cholangitis",
            expected: Some(Pathology::Cholecystitis),
        },
        GoldenCase {
            id: "diverticulitis-with-qualifier",
            raw: "Final Diagnosis: Acute diverticulitis with abscess",
            expected: Some(Pathology::Diverticulitis),
        },
        GoldenCase {
            id: "pancreatitis-necrotizing",
            raw: "Final Diagnosis: Severe necrotizing pancreatitis",
            expected: Some(Pathology::Pancreatitis),
        },
        GoldenCase {
            id: "pericarditis-lenient",
            raw: "Final Diagnosis: Pericardial effusion",
            expected: Some(Pathology::Pericarditis),
        },
        GoldenCase {
            id: "pneumonia-with-rationale",
            raw: "Final Diagnosis: Community-acquired pneumonia Rationale: fever and infiltrate",
            expected: Some(Pathology::Pneumonia),
        },
        GoldenCase {
            id: "pe-abbreviation",
            raw: "Final Diagnosis: PE",
            expected: Some(Pathology::PulmonaryEmbolism),
        },
        GoldenCase {
            id: "pe-thrombus-pattern",
            raw: "Final Diagnosis: Pulmonary artery thrombus",
            expected: Some(Pathology::PulmonaryEmbolism),
        },
        GoldenCase {
            id: "pe-emphasis-markup",
            raw: "Final Diagnosis: **Pulmonary Embolism**",
            expected: Some(Pathology::PulmonaryEmbolism),
        },
        GoldenCase {
            id: "unmapped-out-of-taxonomy",
            raw: "Final Diagnosis: Viral gastroenteritis",
            expected: None,
        },
        GoldenCase {
            id: "negated-diagnosis-does-not-map",
            raw: "Final Diagnosis: No evidence of appendicitis",
            expected: None,
        },
    ]
}

#[test]
fn test_golden_cases() {
    let rules = clinical_rule_table();
    let detector = NegexDetector::new();
    let mapper = Mapper::new(&rules, &detector);

    for case in get_golden_cases() {
        let mapped = mapper.extract_and_map(case.raw);
        assert_eq!(
            mapped.pathology(),
            case.expected,
            "Case {}: expected {:?}, got {:?} (label: {:?})",
            case.id,
            case.expected,
            mapped.pathology(),
            mapped.label()
        );
    }
}

#[test]
fn test_every_strict_rule_maps_to_its_pathology() {
    let rules = clinical_rule_table();
    let detector = NegexDetector::new();
    let mapper = Mapper::new(&rules, &detector);

    for (pathology, rule_set) in rules.iter() {
        for rule in &rule_set.strict {
            let sentence = match rule.modifiers.first() {
                Some(modifier) => format!("{} {}", rule.location, modifier),
                None => rule.location.clone(),
            };
            let mapped = mapper.map(&sentence, &sentence);
            assert_eq!(
                mapped.pathology(),
                Some(pathology),
                "strict rule '{}' of {} mapped to {:?}",
                rule.location,
                pathology,
                mapped.label()
            );
        }
    }
}

#[test]
fn test_negation_inversion() {
    let rules = clinical_rule_table();
    let detector = NegexDetector::new();
    let mapper = Mapper::new(&rules, &detector);

    let positive = "gallbladder inflammation";
    assert_eq!(
        mapper.map(positive, positive).pathology(),
        Some(Pathology::Cholecystitis)
    );

    let negated = "no evidence of gallbladder inflammation";
    assert_eq!(mapper.map(negated, negated).pathology(), None);
}

#[test]
fn test_unmapped_preserves_phrase() {
    let rules = clinical_rule_table();
    let detector = NegexDetector::new();
    let mapper = Mapper::new(&rules, &detector);

    let mapped = mapper.extract_and_map("Final Diagnosis: Viral gastroenteritis");
    assert_eq!(mapped.label(), "Viral gastroenteritis");
}
