//! The clinical mapping rule table for the seven-pathology taxonomy.

use regex::Regex;

use crate::models::{Pathology, PathologyRule, RuleSet, RuleTable};

fn rule(location: &str, modifiers: &[&str]) -> PathologyRule {
    PathologyRule::new(location, modifiers)
}

/// Build the default rule table. Locations and modifiers are full word
/// forms; the matcher requires whole-word occurrences.
pub fn clinical_rule_table() -> RuleTable {
    RuleTable::from_fn(rule_set_for)
}

fn rule_set_for(pathology: Pathology) -> RuleSet {
    match pathology {
        Pathology::Appendicitis => RuleSet::new(
            vec![
                rule(
                    "appendix",
                    &[
                        "gangrenous",
                        "gangrene",
                        "infected",
                        "infection",
                        "inflamed",
                        "inflammation",
                        "abscess",
                        "ruptured",
                        "rupture",
                        "necrosis",
                        "necrotic",
                        "perforated",
                        "perforation",
                    ],
                ),
                rule(
                    "appendiceal",
                    &["abscess", "perforation", "rupture", "inflammation"],
                ),
            ],
            // Common misspelling seen in model output.
            vec![rule("appendercitis", &[])],
        ),
        Pathology::Cholecystitis => RuleSet::new(
            vec![
                rule(
                    "gallbladder",
                    &[
                        "gangrenous",
                        "gangrene",
                        "infected",
                        "infection",
                        "inflamed",
                        "inflammation",
                        "abscess",
                        "necrosis",
                        "necrotic",
                        "perforated",
                        "perforation",
                        "empyema",
                    ],
                ),
                rule("cholangitis", &[]),
            ],
            vec![
                rule("gallbladder", &["disease", "attack"]),
                rule("biliary", &["colic"]),
            ],
        ),
        Pathology::Diverticulitis => RuleSet::new(
            vec![
                rule(
                    "diverticular",
                    &["inflammation", "infection", "abscess", "perforation", "rupture"],
                ),
                rule(
                    "diverticulum",
                    &["inflamed", "infected", "perforated", "ruptured", "abscess"],
                ),
                rule(
                    "diverticula",
                    &["inflamed", "infected", "perforated", "ruptured", "abscess"],
                ),
            ],
            vec![
                rule("colonic", &["perforation", "perforated"]),
                rule("sigmoid", &["perforation", "perforated", "colitis"]),
            ],
        ),
        Pathology::Pancreatitis => RuleSet::new(
            vec![
                rule(
                    "pancreas",
                    &[
                        "gangrenous",
                        "infected",
                        "infection",
                        "inflamed",
                        "inflammation",
                        "abscess",
                        "necrosis",
                        "necrotic",
                        "necrotizing",
                    ],
                ),
                rule("pancreatic", &["inflammation", "abscess", "necrosis"]),
            ],
            vec![],
        ),
        Pathology::Pericarditis => RuleSet::new(
            vec![
                rule("pericardium", &["inflammation", "inflamed"]),
                rule("pericardial", &["inflammation", "inflammatory"]),
                rule("heart sac", &["inflammation"]),
                rule("cardiac membrane", &["inflammation"]),
            ],
            vec![
                rule(
                    "pericardial",
                    &[
                        "effusion",
                        "thickening",
                        "fluid",
                        "fibrosis",
                        "adhesions",
                        "calcification",
                    ],
                ),
                rule("pericardium", &["effusion", "thickening", "fibrosis"]),
            ],
        ),
        Pathology::Pneumonia => RuleSet::new(
            vec![
                rule(
                    "lung",
                    &["infection", "infected", "pneumonitis", "bacterial", "viral", "aspiration"],
                ),
                rule(
                    "pneumonia",
                    &[
                        "acute",
                        "pneumonitis",
                        "bacterial",
                        "viral",
                        "aspiration",
                        "community",
                        "hospital",
                        "lobar",
                    ],
                ),
            ],
            vec![rule(
                "respiratory",
                &["infection", "bacterial", "viral", "fungal"],
            )],
        ),
        Pathology::PulmonaryEmbolism => RuleSet::new(
            vec![
                rule(
                    "pulmonary",
                    &["embolism", "embolus", "emboli", "thrombus", "thromboembolism"],
                ),
                rule("pe", &[]),
            ],
            vec![],
        )
        .with_patterns(vec![
            Regex::new(r"(?i)\b(?:pulmonary\s+embolism|PE)\b").expect("valid pattern"),
            Regex::new(r"(?i)\b(?:pulmonary|PE)\b.*?\b(?:embolus|thrombus)\b")
                .expect("valid pattern"),
        ]),
    }
}
