//! Static clinical reference tables.
//!
//! Everything in this module is configuration data, loaded once at startup
//! and shared read-only across all concurrent evaluations: the per-pathology
//! mapping rules, the MIMIC lab item-id panels, and the per-procedure
//! ICD-9/ICD-10/keyword lists.

mod labs;
mod procedures;
mod rules;

pub use labs::*;
pub use procedures::*;
pub use rules::*;
