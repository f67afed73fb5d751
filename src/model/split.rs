//! Seeded train/test partitioning and held-out evaluation metrics.

use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::config::SplitConfig;
use crate::error::{EngineError, Result};

/// Each side of a split must keep at least this many rows.
const MIN_PARTITION: usize = 2;

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffles `0..n` with the configured seed and holds out
/// `ceil(n * test_fraction)` rows for testing.
///
/// # Errors
///
/// `InsufficientData` if `n` is below `min_records` or either partition would
/// be smaller than two rows.
pub fn train_test_split(n: usize, config: &SplitConfig, model: &'static str) -> Result<Split> {
    let insufficient = || EngineError::InsufficientData {
        model,
        available: n,
        required: config.min_records.max(2 * MIN_PARTITION),
    };
    if n < config.min_records {
        return Err(insufficient());
    }

    let n_test = (n as f64 * config.test_fraction).ceil() as usize;
    if n_test < MIN_PARTITION || n.saturating_sub(n_test) < MIN_PARTITION {
        return Err(insufficient());
    }

    let mut idx: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    idx.shuffle(&mut rng);

    let train = idx.split_off(n_test);
    Ok(Split { train, test: idx })
}

/// Held-out fit metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub r2: f64,
    pub mae: f64,
}

impl Metrics {
    pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Self {
        Self {
            r2: r2_score(actual, predicted),
            mae: mean_absolute_error(actual, predicted),
        }
    }
}

/// Coefficient of determination.
///
/// A constant target scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).abs())
        .sum();
    total / actual.len() as f64
}
