//! Diagnosis phrase extraction from raw model completions.
//!
//! Model output mixes the diagnosis with rationale, treatment plans, and
//! other explanatory sections. The extractor isolates the first diagnosis
//! clause so the mapper and comparator see only the candidate label.

use regex::Regex;

/// Section headers that end the diagnosis span. Each fragment is compiled as
/// `{fragment}s?:` and everything from the header onward is dropped.
const SECTION_HEADERS: &[&str] = &[
    "rationale",
    "note",
    "recommendation",
    "explanation",
    "finding",
    "other.*diagnos.*include",
    "other.*diagnos.*considered(?: were)?",
    "management",
    "action",
    "plan",
    "reasoning",
    "reasons",
    "assessment",
    "justification",
    "tests",
    "additional diagnoses",
    "notification",
    "impression",
    "background",
    "additional findings include",
    "diagnostic criteria.*",
    "diagnostic criteria met",
    "criteria met",
    "characterized by",
    "rare",
];

/// Extracts the diagnosis clause from raw completions.
pub struct Extractor {
    marker: Regex,
    treatment_cut: Regex,
    section_headers: Vec<Regex>,
    colon_block: Regex,
    leading_label: Regex,
    dash_tail: Regex,
    clause_split: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        let section_headers = SECTION_HEADERS
            .iter()
            .map(|fragment| {
                Regex::new(&format!(r"(?is){fragment}s?:.*")).expect("valid section pattern")
            })
            .collect();
        Self {
            marker: Regex::new(r"(?i)(final\s+)?diagnosis\s*:").expect("valid pattern"),
            // A period or newline followed, on the same line, by a
            // treatment-like header ends the diagnosis span.
            treatment_cut: Regex::new(r"(?i)[.\n][^\n]*treatment[^\n]*:").expect("valid pattern"),
            section_headers,
            colon_block: Regex::new(r"(?s):\n.*").expect("valid pattern"),
            leading_label: Regex::new(r"^.*:\s*").expect("valid pattern"),
            dash_tail: Regex::new(r"(?s)\s+-\s+.*").expect("valid pattern"),
            clause_split: Regex::new(r"[,.\n]|\s*\b(?:and|or|vs[.]?)\b\s*")
                .expect("valid pattern"),
        }
    }

    /// Isolate the diagnosis clause. Falls back to the whole text when no
    /// `Diagnosis:` marker is present; returns an empty string only for
    /// blank input.
    pub fn extract(&self, raw_text: &str) -> String {
        if raw_text.trim().is_empty() {
            return String::new();
        }

        let span = match self.marker.find(raw_text) {
            Some(m) => {
                let after = &raw_text[m.end()..];
                match self.treatment_cut.find(after) {
                    Some(cut) => &after[..cut.start()],
                    None => after,
                }
            }
            None => raw_text,
        };

        let mut diagnosis = span.to_string();
        for header in &self.section_headers {
            diagnosis = header.replace(&diagnosis, "").into_owned();
        }
        diagnosis = self.colon_block.replace(&diagnosis, "").into_owned();
        diagnosis = self.leading_label.replace(&diagnosis, "").into_owned();
        diagnosis = self.dash_tail.replace(&diagnosis, "").into_owned();

        let first_clause = self
            .clause_split
            .split(&diagnosis)
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        first_clause.replace("**", "").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_diagnosis() {
        let extractor = Extractor::new();
        assert_eq!(
            extractor.extract("Final Diagnosis: Acute Appendicitis"),
            "Acute Appendicitis"
        );
    }

    #[test]
    fn test_first_clause_only() {
        let extractor = Extractor::new();
        assert_eq!(
            extractor.extract("Final Diagnosis: Acute Appendicitis due to obstruction."),
            "Acute Appendicitis due to obstruction"
        );
        assert_eq!(
            extractor.extract("Final Diagnosis: Acute cholecystitis, with gallstones"),
            "Acute cholecystitis"
        );
        assert_eq!(
            extractor.extract("Final Diagnosis: pericarditis and pleural effusion"),
            "pericarditis"
        );
    }

    #[test]
    fn test_treatment_section_is_cut() {
        let extractor = Extractor::new();
        let raw = "Final Diagnosis: Acute pancreatitis.\nTreatment plan: IV fluids and analgesia";
        assert_eq!(extractor.extract(raw), "Acute pancreatitis");
    }

    #[test]
    fn test_rationale_section_is_cut() {
        let extractor = Extractor::new();
        let raw = "Final Diagnosis: Pneumonia Rationale: fever, productive cough, infiltrate";
        assert_eq!(extractor.extract(raw), "Pneumonia");
    }

    #[test]
    fn test_emphasis_markers_stripped() {
        let extractor = Extractor::new();
        assert_eq!(
            extractor.extract("Final Diagnosis: **Pulmonary Embolism**"),
            "Pulmonary Embolism"
        );
    }

    #[test]
    fn test_missing_marker_falls_back_to_whole_text() {
        let extractor = Extractor::new();
        assert_eq!(extractor.extract("Acute diverticulitis"), "Acute diverticulitis");
    }

    #[test]
    fn test_blank_input() {
        let extractor = Extractor::new();
        assert_eq!(extractor.extract(""), "");
        assert_eq!(extractor.extract("   \n "), "");
    }

    #[test]
    fn test_dash_tail_removed() {
        let extractor = Extractor::new();
        assert_eq!(
            extractor.extract("Final Diagnosis: Acute cholecystitis - supported by ultrasound"),
            "Acute cholecystitis"
        );
    }
}
