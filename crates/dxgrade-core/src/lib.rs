//! DxGrade Core Library
//!
//! Diagnosis-normalization-and-scoring engine for evaluating free-text
//! clinical diagnoses from language models against a fixed taxonomy of seven
//! diseases.
//!
//! # Architecture
//!
//! ```text
//! Raw completion → Extractor → Mapper ──────────────┐
//!                                │                  │
//!                                ▼                  ▼
//!                      Consistency Comparator   Scoring Engine
//!                      (embedding similarity)   (per-pathology rubric)
//!                                                   │
//!                                  Case data ───────┤
//!                            (labs, imaging,        ▼
//!                             procedure codes)  ScoreRecord
//! ```
//!
//! # Core Principle
//!
//! **One scorer per case.** Evaluating a case consumes its scorer, so
//! accumulated scores can never leak between patients. Rule tables and the
//! negation/embedding models are shared read-only.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Pathology, Case, ScoreRecord, etc.)
//! - [`text`]: Negation-aware keyword and procedure-code leaf utilities
//! - [`extract`]: Diagnosis phrase extraction from raw completions
//! - [`mapper`]: Canonical mapping onto the taxonomy
//! - [`compare`]: Cross-model consistency via embedding similarity
//! - [`scoring`]: Per-pathology rubric scoring engine
//! - [`tables`]: Static clinical reference data
//! - [`batch`]: Parallel batch evaluation and multi-model runs

pub mod batch;
pub mod compare;
pub mod extract;
pub mod mapper;
pub mod models;
pub mod scoring;
pub mod tables;
pub mod text;

// Re-export commonly used types
pub use compare::{Comparator, Embedder, DEFAULT_THRESHOLD};
pub use extract::Extractor;
pub use mapper::{MappedDiagnosis, Mapper};
pub use models::{
    Case, ConsistencyStatus, ImagingObservation, LabResult, PairScore, Pathology,
    PathologyRule, PatientProcedures, Region, RuleSet, RuleTable, ScoreRecord,
    TreatmentReconciliation,
};
pub use scoring::{rubric_for, CaseScorer, PathologyRubric, ScoreError, ScoreResult};
pub use tables::clinical_rule_table;
pub use text::{KeywordChecker, NegationDetector, NoNegation};
