// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles row indices with a seeded RNG and cuts them into:
//   - Training set: used to update model weights
//   - Test set:     held out, used for validation and evaluation
//
// Sizes:  test = ceil(n * test_fraction), train = n - test
// Default: 20% test, seed 42
//
// The RNG is ChaCha8 seeded from a u64, so the same seed gives
// the same split on every platform and every run.
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Disjoint row-index sets covering 0..n
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

impl Split {
    pub fn total(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// Pick the training rows out of a column.
    pub fn train_values<T: Clone>(&self, values: &[T]) -> Vec<T> {
        self.train.iter().map(|&i| values[i].clone()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Splitter {
    test_fraction: f64,
    seed: u64,
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_FRACTION, DEFAULT_SEED)
    }
}

impl Splitter {
    /// `test_fraction` is clamped to [0, 1].
    pub fn new(test_fraction: f64, seed: u64) -> Self {
        Self { test_fraction: test_fraction.clamp(0.0, 1.0), seed }
    }

    /// Randomly assign the rows 0..n to train and test.
    pub fn split(&self, n: usize) -> Split {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut rows: Vec<usize> = (0..n).collect();
        rows.shuffle(&mut rng);

        let test_len = ((n as f64) * self.test_fraction).ceil() as usize;
        let test_len = test_len.min(n);

        // split_off(k) leaves [0..k) in place and returns [k..n)
        let train = rows.split_off(test_len);
        let test = rows;

        tracing::debug!(
            "Row split: {} train, {} test (seed {})",
            train.len(),
            test.len(),
            self.seed
        );

        Split { train, test }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_correct_split_sizes() {
        let s = Splitter::default().split(100);
        assert_eq!(s.train.len(), 80);
        assert_eq!(s.test.len(), 20);
    }

    #[test]
    fn test_test_size_rounds_up() {
        // ceil(0.2 * 11) = 3
        let s = Splitter::default().split(11);
        assert_eq!(s.test.len(), 3);
        assert_eq!(s.train.len(), 8);
    }

    #[test]
    fn test_disjoint_and_complete_for_any_ratio() {
        for &fraction in &[0.0, 0.1, 0.2, 0.5, 0.75, 1.0] {
            for &n in &[0usize, 1, 7, 50] {
                let s = Splitter::new(fraction, 7).split(n);
                assert_eq!(s.total(), n);

                let train: HashSet<_> = s.train.iter().copied().collect();
                let test: HashSet<_> = s.test.iter().copied().collect();
                assert!(train.is_disjoint(&test));

                let all: HashSet<_> = train.union(&test).copied().collect();
                assert_eq!(all, (0..n).collect::<HashSet<_>>());
            }
        }
    }

    #[test]
    fn test_same_seed_same_split() {
        assert_eq!(Splitter::default().split(40), Splitter::default().split(40));
        assert_ne!(Splitter::new(0.2, 1).split(40), Splitter::new(0.2, 2).split(40));
    }

    #[test]
    fn test_train_values_follow_indices() {
        let split = Split { train: vec![2, 0], test: vec![1] };
        let col = ["a", "b", "c"];
        assert_eq!(split.train_values(&col), vec!["c", "a"]);
    }
}
