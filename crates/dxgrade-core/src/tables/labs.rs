//! Laboratory test identifier panels (MIMIC itemid convention).

/// Core inflammation markers required by every workup.
pub const INFLAMMATION_LAB_TESTS: &[u32] = &[
    51301, // White Blood Cells
    51256, // Neutrophils
];

/// Complete Blood Count panel.
pub const CBC_PANEL: &[u32] = &[
    51221, // Hematocrit
    51222, // Hemoglobin
    51248, // MCH
    51249, // MCHC
    51250, // MCV
    51265, // Platelet Count
    51277, // RDW
    51279, // Red Blood Cells
    51301, // White Blood Cells
];

/// Renal Function Panel.
pub const RENAL_PANEL: &[u32] = &[
    50912, // Creatinine
    51006, // Urea Nitrogen
    50983, // Sodium
    50971, // Potassium
    50902, // Chloride
    50882, // Bicarbonate
    50931, // Glucose
    50893, // Calcium, Total
];

/// Liver Function Panel.
pub const LIVER_PANEL: &[u32] = &[
    50861, // Alanine Aminotransferase (ALT)
    50878, // Asparate Aminotransferase (AST)
    50863, // Alkaline Phosphatase
    50885, // Bilirubin, Total
    50884, // Bilirubin, Direct
    50883, // Bilirubin, Indirect
    50862, // Albumin
];

/// Urinalysis panel.
pub const URINALYSIS_PANEL: &[u32] = &[
    51484, // Ketone
    51486, // Leukocytes
    51487, // Nitrite
    51491, // pH
    51492, // Protein
    51493, // RBC
    51498, // Specific Gravity
    51516, // WBC
];

// Individual markers referenced by per-pathology workups.
pub const CRP: u32 = 50889; // C-Reactive Protein
pub const ESR: u32 = 51288; // Sedimentation Rate
pub const PROCALCITONIN: u32 = 50890;
pub const TROPONIN_T: u32 = 51003;
pub const NTPROBNP: u32 = 50963;
pub const AMYLASE: u32 = 50867;
pub const LIPASE: u32 = 50956;
pub const D_DIMER: u32 = 50915;
pub const FIBRINOGEN: u32 = 51214;
pub const PT: u32 = 51274;
pub const PTT: u32 = 51275;
pub const INR: u32 = 51237;
pub const BLOOD_GAS_PCO2: u32 = 50818;
pub const BLOOD_GAS_PH: u32 = 50820;
pub const BLOOD_GAS_PO2: u32 = 50821;
pub const BLOOD_GAS_POTASSIUM: u32 = 50822;
pub const SPUTUM_CULTURE: u32 = 90234;
pub const BLOOD_CULTURE: u32 = 90201;

/// Concatenate panels into one neutral-test list, dropping ids already
/// required by the workup.
pub fn neutral_tests(panels: &[&[u32]], required: &[&[u32]]) -> Vec<u32> {
    let mut out = Vec::new();
    for panel in panels {
        for &test in *panel {
            if required.iter().any(|cat| cat.contains(&test)) {
                continue;
            }
            if !out.contains(&test) {
                out.push(test);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_tests_excludes_required() {
        let required = vec![INFLAMMATION_LAB_TESTS.to_vec()];
        let required_refs: Vec<&[u32]> = required.iter().map(|v| v.as_slice()).collect();
        let neutral = neutral_tests(&[CBC_PANEL], &required_refs);

        // WBC is required for inflammation, so it must not be neutral.
        assert!(!neutral.contains(&51301));
        assert!(neutral.contains(&51221));
    }

    #[test]
    fn test_neutral_tests_dedups_across_panels() {
        let neutral = neutral_tests(&[CBC_PANEL, CBC_PANEL], &[]);
        assert_eq!(neutral.len(), CBC_PANEL.len());
    }
}
