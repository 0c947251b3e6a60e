//! Deterministic text embedding.
//!
//! A character-trigram hashing embedder: no model weights, no I/O, and
//! identical inputs always produce identical vectors. It stands in for the
//! transformer sentence encoder behind the same [`Embedder`] trait, and is
//! the backend of choice for tests and offline runs.

use dxgrade_core::compare::Embedder;

/// Default embedding dimensionality.
pub const DEFAULT_DIM: usize = 256;

/// Character-trigram hashing embedder producing L2-normalized vectors.
pub struct HashingEmbedder {
    dim: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self::with_dim(DEFAULT_DIM)
    }

    pub fn with_dim(dim: usize) -> Self {
        assert!(dim > 0, "embedding dimension must be positive");
        Self { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Lowercase and collapse runs of whitespace to single spaces, with
    /// leading/trailing padding so word boundaries form trigrams too.
    fn normalize(text: &str) -> String {
        let collapsed = text
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if collapsed.is_empty() {
            collapsed
        } else {
            format!(" {collapsed} ")
        }
    }
}

impl Embedder for HashingEmbedder {
    fn encode(&self, text: &str) -> Vec<f32> {
        let normalized = Self::normalize(text);
        let chars: Vec<char> = normalized.chars().collect();
        let mut vector = vec![0.0f32; self.dim];

        if chars.len() >= 3 {
            for window in chars.windows(3) {
                let bucket = (fnv1a(window) % self.dim as u64) as usize;
                vector[bucket] += 1.0;
            }
        } else if !chars.is_empty() {
            let bucket = (fnv1a(&chars) % self.dim as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

/// FNV-1a over the UTF-8 bytes of a character window. Stable across
/// processes, unlike the standard library's randomized hasher.
fn fnv1a(chars: &[char]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let mut buf = [0u8; 4];
    for c in chars {
        for byte in c.encode_utf8(&mut buf).as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxgrade_core::compare::cosine_similarity;
    use proptest::prelude::*;

    #[test]
    fn test_deterministic() {
        let embedder = HashingEmbedder::new();
        assert_eq!(
            embedder.encode("acute appendicitis"),
            embedder.encode("acute appendicitis")
        );
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let embedder = HashingEmbedder::new();
        assert_eq!(
            embedder.encode("Acute  Appendicitis"),
            embedder.encode("acute appendicitis")
        );
    }

    #[test]
    fn test_self_similarity_is_one() {
        let embedder = HashingEmbedder::new();
        let v = embedder.encode("pericarditis");
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_related_phrases_score_higher() {
        let embedder = HashingEmbedder::new();
        let a = embedder.encode("acute appendicitis");
        let b = embedder.encode("appendicitis");
        let c = embedder.encode("pulmonary embolism");
        assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new();
        let v = embedder.encode("");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_batch_matches_single() {
        let embedder = HashingEmbedder::new();
        let batch = embedder.encode_batch(&["cholecystitis", "cholangitis"]);
        assert_eq!(batch[0], embedder.encode("cholecystitis"));
        assert_eq!(batch[1], embedder.encode("cholangitis"));
    }

    proptest! {
        #[test]
        fn prop_encode_is_deterministic_and_normalized(text in ".{0,64}") {
            let embedder = HashingEmbedder::new();
            let a = embedder.encode(&text);
            let b = embedder.encode(&text);
            prop_assert_eq!(&a, &b);

            let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
            prop_assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-3);
        }
    }
}
