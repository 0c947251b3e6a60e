//! Cross-model consistency comparison via embedding similarity.

use regex::Regex;

use crate::models::{ConsistencyStatus, InconsistencyReason, PairScore};

/// Default similarity threshold for calling two diagnoses consistent.
pub const DEFAULT_THRESHOLD: f64 = 0.83;

/// Sentence embedding, supplied by an external model. Inference must be
/// deterministic: identical inputs yield identical vectors.
pub trait Embedder: Send + Sync {
    fn encode(&self, text: &str) -> Vec<f32>;

    /// Encode several texts in one call. Implementations backed by batched
    /// inference should override this; comparisons go through it so batching
    /// is available wherever the backend supports it.
    fn encode_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }
}

/// Cosine similarity between two embedding vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Separators that introduce qualifying or alternative diagnoses; only the
/// text before the first one counts as the primary label.
const SPLIT_PHRASES: &[&str] = &[" with ", " secondary to ", " due to ", "/", " vs "];

/// Decides whether 2-3 normalized diagnoses agree.
pub struct Comparator<'a> {
    embedder: &'a dyn Embedder,
    threshold: f64,
    parenthetical: Regex,
}

impl<'a> Comparator<'a> {
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self::with_threshold(embedder, DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(embedder: &'a dyn Embedder, threshold: f64) -> Self {
        Self {
            embedder,
            threshold,
            parenthetical: Regex::new(r"\([^)]*\)").expect("valid pattern"),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Lowercase, strip parenthetical asides, and truncate at the first
    /// qualifying-phrase separator.
    fn normalize(&self, diagnosis: &str) -> String {
        let mut norm = self.parenthetical.replace_all(&diagnosis.to_lowercase(), "").into_owned();
        for phrase in SPLIT_PHRASES {
            if let Some(pos) = norm.find(phrase) {
                norm.truncate(pos);
            }
        }
        norm.trim().to_string()
    }

    /// Compare 2-3 diagnoses. With three, all three pairwise similarities
    /// must reach the threshold (conjunction); an empty diagnosis among
    /// three is silently excluded, while among two it is inconsistent
    /// outright. The threshold check is inclusive.
    pub fn compare(&self, diagnoses: &[String]) -> (ConsistencyStatus, Vec<PairScore>) {
        if diagnoses.len() < 2 {
            return (ConsistencyStatus::InsufficientInformation, Vec::new());
        }

        let normalized: Vec<String> = diagnoses.iter().map(|d| self.normalize(d)).collect();

        match normalized.len() {
            2 => {
                if normalized.iter().any(|d| d.is_empty()) {
                    return (
                        ConsistencyStatus::Inconsistent(InconsistencyReason::EmptyDiagnosis),
                        Vec::new(),
                    );
                }
                let scores = self.pairwise(&normalized, &[(0, 1)]);
                (self.status_from(&scores), scores)
            }
            3 => {
                let non_empty: Vec<usize> = normalized
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| !d.is_empty())
                    .map(|(i, _)| i)
                    .collect();

                match non_empty.len() {
                    3 => {
                        let scores = self.pairwise(&normalized, &[(0, 1), (0, 2), (1, 2)]);
                        (self.status_from(&scores), scores)
                    }
                    2 => {
                        let scores =
                            self.pairwise(&normalized, &[(non_empty[0], non_empty[1])]);
                        (self.status_from(&scores), scores)
                    }
                    _ => (
                        ConsistencyStatus::Inconsistent(
                            InconsistencyReason::InsufficientValidDiagnoses,
                        ),
                        Vec::new(),
                    ),
                }
            }
            _ => (ConsistencyStatus::InsufficientInformation, Vec::new()),
        }
    }

    fn pairwise(&self, normalized: &[String], pairs: &[(usize, usize)]) -> Vec<PairScore> {
        let texts: Vec<&str> = normalized.iter().map(String::as_str).collect();
        let embeddings = self.embedder.encode_batch(&texts);
        pairs
            .iter()
            .map(|&(left, right)| PairScore {
                left,
                right,
                similarity: cosine_similarity(&embeddings[left], &embeddings[right]),
            })
            .collect()
    }

    fn status_from(&self, scores: &[PairScore]) -> ConsistencyStatus {
        if scores.iter().all(|s| s.similarity >= self.threshold) {
            ConsistencyStatus::Consistent
        } else {
            ConsistencyStatus::Inconsistent(InconsistencyReason::BelowThreshold)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Embedder returning fixed unit vectors per text, for engineered
    /// pairwise similarities.
    struct FixedEmbedder {
        vectors: HashMap<String, Vec<f32>>,
    }

    impl FixedEmbedder {
        fn new(entries: &[(&str, Vec<f32>)]) -> Self {
            Self {
                vectors: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            }
        }
    }

    impl Embedder for FixedEmbedder {
        fn encode(&self, text: &str) -> Vec<f32> {
            self.vectors
                .get(text)
                .cloned()
                .unwrap_or_else(|| vec![0.0, 0.0, 1.0])
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fewer_than_two_is_insufficient() {
        let embedder = FixedEmbedder::new(&[]);
        let comparator = Comparator::new(&embedder);
        let (status, scores) = comparator.compare(&strings(&["appendicitis"]));
        assert_eq!(status, ConsistencyStatus::InsufficientInformation);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_empty_diagnosis_among_two() {
        let embedder = FixedEmbedder::new(&[]);
        let comparator = Comparator::new(&embedder);
        let (status, _) = comparator.compare(&strings(&["", "Acute pancreatitis"]));
        assert_eq!(
            status,
            ConsistencyStatus::Inconsistent(InconsistencyReason::EmptyDiagnosis)
        );
        assert_eq!(status.to_string(), "Inconsistent (Empty diagnosis exists)");
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        // cos((3,4), (4,3)) = 24/25 = 0.96, exact in IEEE arithmetic, so a
        // threshold of exactly 0.96 exercises the >= comparison.
        let embedder = FixedEmbedder::new(&[
            ("appendicitis", vec![3.0, 4.0]),
            ("acute appendicitis", vec![4.0, 3.0]),
        ]);
        let diagnoses = strings(&["appendicitis", "acute appendicitis"]);

        let at_threshold = Comparator::with_threshold(&embedder, 0.96);
        let (status, scores) = at_threshold.compare(&diagnoses);
        assert_eq!(status, ConsistencyStatus::Consistent);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].similarity, 0.96);

        let above_threshold = Comparator::with_threshold(&embedder, 0.97);
        let (status, _) = above_threshold.compare(&diagnoses);
        assert_eq!(
            status,
            ConsistencyStatus::Inconsistent(InconsistencyReason::BelowThreshold)
        );
    }

    #[test]
    fn test_comparator_symmetry() {
        let embedder = FixedEmbedder::new(&[
            ("appendicitis", vec![1.0, 0.0, 0.0]),
            ("cholecystitis", vec![0.6, 0.8, 0.0]),
        ]);
        let comparator = Comparator::new(&embedder);
        let (status_ab, scores_ab) =
            comparator.compare(&strings(&["appendicitis", "cholecystitis"]));
        let (status_ba, scores_ba) =
            comparator.compare(&strings(&["cholecystitis", "appendicitis"]));
        assert_eq!(status_ab, status_ba);
        assert!((scores_ab[0].similarity - scores_ba[0].similarity).abs() < 1e-9);
    }

    #[test]
    fn test_three_way_requires_all_pairs() {
        // Engineered unit vectors: s12 = 0.9, s13 = 0.6, s23 = 0.85.
        let embedder = FixedEmbedder::new(&[
            ("acute cholecystitis", vec![1.0, 0.0, 0.0]),
            ("cholangitis", vec![0.9, 0.435_89, 0.0]),
            ("acute biliary colic", vec![0.6, 0.711_19, 0.366_35]),
        ]);
        let comparator = Comparator::new(&embedder);
        let (status, scores) = comparator.compare(&strings(&[
            "Acute cholecystitis",
            "Cholangitis",
            "Acute biliary colic",
        ]));
        assert_eq!(scores.len(), 3);
        assert_eq!(
            status,
            ConsistencyStatus::Inconsistent(InconsistencyReason::BelowThreshold)
        );

        let labels: Vec<String> = scores.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["M1-M2", "M1-M3", "M2-M3"]);
    }

    #[test]
    fn test_three_way_with_one_empty_compares_the_rest() {
        let embedder = FixedEmbedder::new(&[
            ("appendicitis", vec![1.0, 0.0, 0.0]),
            ("acute appendicitis", vec![1.0, 0.0, 0.0]),
        ]);
        let comparator = Comparator::new(&embedder);
        let (status, scores) =
            comparator.compare(&strings(&["appendicitis", "", "acute appendicitis"]));
        assert_eq!(status, ConsistencyStatus::Consistent);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].label(), "M1-M3");
    }

    #[test]
    fn test_three_way_with_two_empty_is_inconsistent() {
        let embedder = FixedEmbedder::new(&[]);
        let comparator = Comparator::new(&embedder);
        let (status, _) = comparator.compare(&strings(&["appendicitis", "", ""]));
        assert_eq!(
            status,
            ConsistencyStatus::Inconsistent(InconsistencyReason::InsufficientValidDiagnoses)
        );
    }

    #[test]
    fn test_normalization_strips_qualifiers() {
        let embedder = FixedEmbedder::new(&[]);
        let comparator = Comparator::new(&embedder);
        assert_eq!(
            comparator.normalize("Appendicitis (early) with perforation"),
            "appendicitis"
        );
        assert_eq!(
            comparator.normalize("Cholecystitis secondary to gallstones"),
            "cholecystitis"
        );
        assert_eq!(comparator.normalize("PE/DVT"), "pe");
        assert_eq!(comparator.normalize("pneumonia vs bronchitis"), "pneumonia");
    }
}
