//! Clinical NLP collaborators for the dxgrade engine.
//!
//! Provides the two external-model seams the core engine consumes:
//!
//! - [`NegexDetector`]: rule-based clinical negation detection implementing
//!   [`dxgrade_core::text::NegationDetector`]
//! - [`HashingEmbedder`]: deterministic character-trigram embedding
//!   implementing [`dxgrade_core::compare::Embedder`]
//!
//! Both are pure and read-only after construction, so one instance can be
//! shared across concurrent case evaluations. A transformer-backed sentence
//! encoder can replace [`HashingEmbedder`] behind the same trait.

pub mod embedding;
pub mod negation;

pub use embedding::*;
pub use negation::*;
