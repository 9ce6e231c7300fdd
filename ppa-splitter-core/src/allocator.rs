//! Dataset allocation
//!
//! Given the number of units in a file and the requested ratios, the
//! allocator precomputes one dataset label per unit. Quotas come from
//! rounding `n * ratio`; positions come from a smooth weighted interleave so
//! that every prefix of the sequence stays close to the requested ratios.
//! Corpora are often ordered by text or register, and a contiguous block per
//! dataset would skew each dataset towards part of the file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance when checking that ratios sum to one
pub const RATIO_EPSILON: f64 = 1e-9;

/// Target dataset of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Training set
    Train,
    /// Test set
    Test,
    /// Development set
    Dev,
}

impl Dataset {
    /// All datasets, in tie-break order
    pub const ALL: [Dataset; 3] = [Dataset::Train, Dataset::Test, Dataset::Dev];

    /// Directory and report name
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Train => "train",
            Dataset::Test => "test",
            Dataset::Dev => "dev",
        }
    }

    fn index(self) -> usize {
        match self {
            Dataset::Train => 0,
            Dataset::Test => 1,
            Dataset::Dev => 2,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated train/test/dev ratios
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ratios {
    train: f64,
    test: f64,
    dev: f64,
}

impl Default for Ratios {
    fn default() -> Self {
        Self {
            train: 0.8,
            test: 0.2,
            dev: 0.0,
        }
    }
}

impl Ratios {
    /// Validate and build a ratio triple
    ///
    /// Each value must be a finite number in `[0, 1]` and the three must sum
    /// to one (within [`RATIO_EPSILON`]).
    pub fn new(train: f64, test: f64, dev: f64) -> Result<Self> {
        for (name, value) in [("train", train), ("test", test), ("dev", dev)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::Configuration(format!(
                    "{name} ratio must be between 0 and 1, got {value}"
                )));
            }
        }

        let sum = train + test + dev;
        if (sum - 1.0).abs() > RATIO_EPSILON {
            return Err(Error::Configuration(format!(
                "train, test and dev ratios must sum to 1, got {train} + {test} + {dev} = {sum}"
            )));
        }

        Ok(Self { train, test, dev })
    }

    /// Build from test and dev ratios, train taking the remainder
    pub fn from_test_dev(test: f64, dev: f64) -> Result<Self> {
        let train = 1.0 - test - dev;
        // Float noise can push an exhausted remainder just below zero
        let train = if (-RATIO_EPSILON..0.0).contains(&train) {
            0.0
        } else {
            train
        };
        Self::new(train, test, dev)
    }

    /// Ratio requested for `dataset`
    pub fn get(&self, dataset: Dataset) -> f64 {
        match dataset {
            Dataset::Train => self.train,
            Dataset::Test => self.test,
            Dataset::Dev => self.dev,
        }
    }

    /// Training ratio
    pub fn train(&self) -> f64 {
        self.train
    }

    /// Test ratio
    pub fn test(&self) -> f64 {
        self.test
    }

    /// Development ratio
    pub fn dev(&self) -> f64 {
        self.dev
    }
}

/// A count per dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetCounts {
    train: usize,
    test: usize,
    dev: usize,
}

impl DatasetCounts {
    /// Count for `dataset`
    pub fn get(&self, dataset: Dataset) -> usize {
        match dataset {
            Dataset::Train => self.train,
            Dataset::Test => self.test,
            Dataset::Dev => self.dev,
        }
    }

    /// Add `amount` to `dataset`
    pub fn add(&mut self, dataset: Dataset, amount: usize) {
        match dataset {
            Dataset::Train => self.train += amount,
            Dataset::Test => self.test += amount,
            Dataset::Dev => self.dev += amount,
        }
    }

    /// Sum over all datasets
    pub fn total(&self) -> usize {
        self.train + self.test + self.dev
    }

    /// `(dataset, count)` pairs in [`Dataset::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Dataset, usize)> + '_ {
        Dataset::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Pairs with a count greater than zero
    pub fn non_empty(&self) -> impl Iterator<Item = (Dataset, usize)> + '_ {
        self.iter().filter(|(_, count)| *count > 0)
    }
}

/// Number of units each dataset receives out of `unit_count`
///
/// Test and dev are rounded to the nearest unit, then clamped so they never
/// exceed `unit_count` together (dev gives way first). Train takes the rest.
pub fn target_counts(unit_count: usize, ratios: &Ratios) -> DatasetCounts {
    let quota = |ratio: f64| -> usize {
        if ratio <= 0.0 {
            0
        } else {
            ((unit_count as f64) * ratio).round() as usize
        }
    };

    let test = quota(ratios.test).min(unit_count);
    let dev = quota(ratios.dev).min(unit_count - test);

    DatasetCounts {
        train: unit_count - test - dev,
        test,
        dev,
    }
}

/// Ordered dataset labels for one file, consumed front to back
#[derive(Debug, Clone)]
pub struct LabelSequence {
    labels: Vec<Dataset>,
    cursor: usize,
}

impl LabelSequence {
    /// Allocate `unit_count` labels following `ratios`
    pub fn allocate(unit_count: usize, ratios: &Ratios) -> Self {
        let quotas = target_counts(unit_count, ratios);
        Self {
            labels: interleave(unit_count, &quotas),
            cursor: 0,
        }
    }

    /// Total number of labels, consumed or not
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the sequence holds no labels at all
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels not yet handed out
    pub fn remaining(&self) -> usize {
        self.labels.len() - self.cursor
    }

    /// The full sequence, regardless of the cursor
    pub fn labels(&self) -> &[Dataset] {
        &self.labels
    }

    /// Units per dataset over the full sequence
    pub fn counts(&self) -> DatasetCounts {
        let mut counts = DatasetCounts::default();
        for label in &self.labels {
            counts.add(*label, 1);
        }
        counts
    }
}

impl Iterator for LabelSequence {
    type Item = Dataset;

    fn next(&mut self) -> Option<Dataset> {
        let label = self.labels.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(label)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

/// Label sequence for `unit_count` units; train gets `1 - test - dev`
pub fn build_label_sequence(
    unit_count: usize,
    test_ratio: f64,
    dev_ratio: f64,
) -> Result<LabelSequence> {
    let ratios = Ratios::from_test_dev(test_ratio, dev_ratio)?;
    Ok(LabelSequence::allocate(unit_count, &ratios))
}

// Smooth weighted round robin with exact integer deficits: at step i every
// dataset with quota left is owed `quota * i - assigned * n`, the most owed
// one wins and ties fall to `Dataset::ALL` order.
fn interleave(unit_count: usize, quotas: &DatasetCounts) -> Vec<Dataset> {
    let n = unit_count as u128;
    let mut assigned = [0usize; 3];
    let mut labels = Vec::with_capacity(unit_count);

    for step in 1..=n {
        let mut best: Option<(Dataset, i128)> = None;

        for dataset in Dataset::ALL {
            let quota = quotas.get(dataset);
            let taken = assigned[dataset.index()];
            if taken >= quota {
                continue;
            }

            let deficit = (quota as u128 * step) as i128 - (taken as u128 * n) as i128;
            if best.map_or(true, |(_, d)| deficit > d) {
                best = Some((dataset, deficit));
            }
        }

        // Quotas sum to n, so some dataset always has room left.
        let (dataset, _) = best.unwrap_or((Dataset::Train, 0));
        assigned[dataset.index()] += 1;
        labels.push(dataset);
    }

    labels
}
