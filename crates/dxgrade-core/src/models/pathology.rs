//! The closed pathology taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Anatomical region an imaging study covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Abdomen,
    Chest,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Abdomen => write!(f, "Abdomen"),
            Region::Chest => write!(f, "Chest"),
        }
    }
}

/// One of the seven diseases in the closed taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pathology {
    Appendicitis,
    Cholecystitis,
    Diverticulitis,
    Pancreatitis,
    Pericarditis,
    Pneumonia,
    PulmonaryEmbolism,
}

impl Pathology {
    /// Fixed enumeration order. The mapper resolves ties by this order
    /// (first match wins), so it must never be reordered.
    pub const ALL: [Pathology; 7] = [
        Pathology::Appendicitis,
        Pathology::Cholecystitis,
        Pathology::Diverticulitis,
        Pathology::Pancreatitis,
        Pathology::Pericarditis,
        Pathology::Pneumonia,
        Pathology::PulmonaryEmbolism,
    ];

    /// Lowercase clinical label, as used in diagnosis text.
    pub fn name(&self) -> &'static str {
        match self {
            Pathology::Appendicitis => "appendicitis",
            Pathology::Cholecystitis => "cholecystitis",
            Pathology::Diverticulitis => "diverticulitis",
            Pathology::Pancreatitis => "pancreatitis",
            Pathology::Pericarditis => "pericarditis",
            Pathology::Pneumonia => "pneumonia",
            Pathology::PulmonaryEmbolism => "pulmonary embolism",
        }
    }

    /// Anatomical region whose imaging studies count toward this disease.
    pub fn region(&self) -> Region {
        match self {
            Pathology::Appendicitis
            | Pathology::Cholecystitis
            | Pathology::Diverticulitis
            | Pathology::Pancreatitis => Region::Abdomen,
            Pathology::Pericarditis | Pathology::Pneumonia | Pathology::PulmonaryEmbolism => {
                Region::Chest
            }
        }
    }

    /// Parse a lowercase clinical label back into a variant.
    pub fn from_name(name: &str) -> Option<Pathology> {
        Pathology::ALL.iter().copied().find(|p| p.name() == name)
    }
}

impl fmt::Display for Pathology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
