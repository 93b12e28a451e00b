use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::splits::{
    DEFAULT_TEST_RATIO, DEFAULT_TRAIN_RATIO, DEFAULT_VALIDATION_RATIO,
};
use crate::errors::PipelineError;

/// Logical dataset partitions emitted by the splitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitLabel {
    /// Training split.
    Train,
    /// Validation split.
    Validation,
    /// Test split.
    Test,
}

impl SplitLabel {
    /// Lowercase label used in filenames and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitLabel::Train => "train",
            SplitLabel::Validation => "validation",
            SplitLabel::Test => "test",
        }
    }
}

/// Ratio configuration for train/validation/test assignment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SplitRatios {
    /// Fraction assigned to train.
    pub train: f32,
    /// Fraction assigned to validation.
    pub validation: f32,
    /// Fraction assigned to test.
    pub test: f32,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: DEFAULT_TRAIN_RATIO,
            validation: DEFAULT_VALIDATION_RATIO,
            test: DEFAULT_TEST_RATIO,
        }
    }
}

impl SplitRatios {
    /// Build ratios from validation/test holdout fractions, assigning the
    /// remainder to train.
    pub fn with_holdouts(validation: f32, test: f32) -> Self {
        Self {
            train: 1.0 - validation - test,
            validation,
            test,
        }
    }

    /// Validate that each ratio lies in `[0, 1]` and the sum does not exceed 1.
    pub fn validated(self) -> Result<Self, PipelineError> {
        for (label, value) in [
            ("train", self.train),
            ("validation", self.validation),
            ("test", self.test),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::Configuration(format!(
                    "{label} ratio must be within [0, 1], got {value}"
                )));
            }
        }
        let sum = self.train + self.validation + self.test;
        if sum > 1.0 + 1e-6 {
            return Err(PipelineError::Configuration(format!(
                "split ratios must sum to at most 1.0, got {sum}"
            )));
        }
        Ok(self)
    }
}

/// Pairwise-disjoint partitions whose union is the full input set.
#[derive(Clone, Debug)]
pub struct DatasetSplits<T> {
    /// Training subset.
    pub train: Vec<T>,
    /// Validation subset.
    pub validation: Vec<T>,
    /// Test subset.
    pub test: Vec<T>,
}

impl<T> DatasetSplits<T> {
    /// Total number of records across all three splits.
    pub fn total(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }

    /// Iterate subsets in canonical train/validation/test order.
    pub fn iter_labeled(&self) -> impl Iterator<Item = (SplitLabel, &[T])> {
        crate::constants::splits::ALL_SPLITS.into_iter().zip([
            self.train.as_slice(),
            self.validation.as_slice(),
            self.test.as_slice(),
        ])
    }
}

/// Deterministically partition `records` into train/validation/test.
///
/// The input is shuffled with a splitmix64 generator seeded by `seed` (same
/// seed, same permutation, on every platform), then sliced sequentially.
/// Validation and test receive `floor(n * ratio)` records each; train
/// receives the remainder, so a single record always lands in train. Empty
/// input yields three empty splits without error.
pub fn split_records<T>(
    records: Vec<T>,
    ratios: SplitRatios,
    seed: u64,
) -> Result<DatasetSplits<T>, PipelineError> {
    let ratios = ratios.validated()?;
    let mut shuffled = records;
    let mut rng = DeterministicRng::new(seed);
    shuffled.shuffle(&mut rng);

    let total = shuffled.len();
    let validation_count = (total as f64 * ratios.validation as f64).floor() as usize;
    let test_count = (total as f64 * ratios.test as f64).floor() as usize;
    let train_count = total - validation_count - test_count;

    let mut remaining = shuffled.into_iter();
    let train: Vec<T> = remaining.by_ref().take(train_count).collect();
    let validation: Vec<T> = remaining.by_ref().take(validation_count).collect();
    let test: Vec<T> = remaining.collect();
    Ok(DatasetSplits {
        train,
        validation,
        test,
    })
}

/// Small deterministic RNG (splitmix64) used for reproducible shuffles.
///
/// Seeded explicitly and owned by the splitter call, so reproducibility does
/// not depend on any ambient random state elsewhere in the process.
#[derive(Clone, Debug)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ratios_validate() {
        SplitRatios::default().validated().unwrap();
    }

    #[test]
    fn negative_ratio_is_rejected() {
        let err = SplitRatios::with_holdouts(-0.1, 0.1).validated().unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(msg) if msg.contains("validation")));
    }

    #[test]
    fn oversized_sum_is_rejected() {
        let invalid = SplitRatios {
            train: 0.8,
            validation: 0.2,
            test: 0.2,
        };
        let err = invalid.validated().unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(msg) if msg.contains("sum")));

        let err = split_records(vec![1, 2, 3], invalid, 42).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn counts_follow_floor_with_remainder_to_train() {
        let splits = split_records((0..100).collect(), SplitRatios::default(), 42).unwrap();
        assert_eq!(splits.train.len(), 80);
        assert_eq!(splits.validation.len(), 10);
        assert_eq!(splits.test.len(), 10);
    }

    #[test]
    fn under_unit_sum_sends_slack_to_train() {
        let ratios = SplitRatios {
            train: 0.5,
            validation: 0.2,
            test: 0.2,
        };
        let splits = split_records((0..10).collect(), ratios, 7).unwrap();
        assert_eq!(splits.validation.len(), 2);
        assert_eq!(splits.test.len(), 2);
        assert_eq!(splits.train.len(), 6);
    }

    #[test]
    fn single_record_lands_in_train() {
        let splits = split_records(vec![1], SplitRatios::default(), 42).unwrap();
        assert_eq!(splits.train, vec![1]);
        assert!(splits.validation.is_empty());
        assert!(splits.test.is_empty());
    }

    #[test]
    fn empty_input_yields_three_empty_splits() {
        let splits: DatasetSplits<u32> =
            split_records(Vec::new(), SplitRatios::default(), 42).unwrap();
        assert_eq!(splits.total(), 0);
    }

    #[test]
    fn same_seed_reproduces_the_same_partition() {
        let records: Vec<u32> = (0..500).collect();
        let first = split_records(records.clone(), SplitRatios::default(), 42).unwrap();
        let second = split_records(records.clone(), SplitRatios::default(), 42).unwrap();
        assert_eq!(first.train, second.train);
        assert_eq!(first.validation, second.validation);
        assert_eq!(first.test, second.test);

        let other_seed = split_records(records, SplitRatios::default(), 43).unwrap();
        assert_ne!(first.train, other_seed.train);
    }

    #[test]
    fn shuffle_permutes_without_losing_records() {
        let splits = split_records((0..1000).collect(), SplitRatios::default(), 42).unwrap();
        let mut all: Vec<u32> = splits
            .train
            .iter()
            .chain(splits.validation.iter())
            .chain(splits.test.iter())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..1000).collect::<Vec<u32>>());
    }

    #[test]
    fn labeled_iteration_follows_canonical_order() {
        let splits = split_records((0..100).collect(), SplitRatios::default(), 42).unwrap();
        let labels: Vec<&str> = splits
            .iter_labeled()
            .map(|(label, _)| label.as_str())
            .collect();
        assert_eq!(labels, ["train", "validation", "test"]);
        let counts: Vec<usize> = splits
            .iter_labeled()
            .map(|(_, records)| records.len())
            .collect();
        assert_eq!(counts, [80, 10, 10]);
    }

    #[test]
    fn zero_holdouts_put_everything_in_train() {
        let ratios = SplitRatios::with_holdouts(0.0, 0.0);
        let splits = split_records((0..100).collect(), ratios, 42).unwrap();
        assert_eq!(splits.train.len(), 100);
        assert!(splits.validation.is_empty());
        assert!(splits.test.is_empty());
    }
}
