//! Once-only training and retention of the demand and satisfaction models.
//!
//! Each model lives in its own `OnceLock`: the first caller trains it, any
//! concurrent callers block until that run finishes, and everyone afterwards
//! receives the same fitted model (or the same cached training error).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::{info, warn};

use crate::config::{ForestConfig, SplitConfig};
use crate::data::{Dataset, Record};
use crate::error::Result;

use super::forest::RandomForest;
use super::linear::LinearRegression;
use super::split::{Metrics, train_test_split};
use super::Regressor;

/// Demand model inputs, in column order.
pub const DEMAND_FEATURES: [&str; 3] = ["footfall", "zone_encoded", "time_slot_encoded"];

/// Satisfaction model inputs, in column order.
pub const SATISFACTION_FEATURES: [&str; 4] = [
    "congestion_index",
    "Avg_Delay_Min",
    "waste_percent",
    "Response_Time_hr",
];

/// Demand feature vector for one record.
pub fn demand_features(r: &Record) -> [f64; 3] {
    [
        f64::from(r.footfall),
        f64::from(r.zone_encoded),
        f64::from(r.time_slot_encoded),
    ]
}

/// Satisfaction feature vector for one record; undefined waste counts as 0.
pub fn satisfaction_features(r: &Record) -> [f64; 4] {
    [
        r.congestion_index,
        r.avg_delay_min,
        r.waste_percent.unwrap_or(0.0),
        r.response_time_hr,
    ]
}

/// A fitted model with its held-out evaluation.
#[derive(Debug, Clone)]
pub struct TrainedModel<M> {
    pub model: M,
    pub metrics: Metrics,
    pub feature_names: &'static [&'static str],
    test_indices: Vec<usize>,
    test_predictions: Vec<f64>,
}

impl<M> TrainedModel<M> {
    /// Dataset positions of the held-out rows, in split order.
    pub fn test_indices(&self) -> &[usize] {
        &self.test_indices
    }

    /// Predictions for [`TrainedModel::test_indices`], same order.
    pub fn test_predictions(&self) -> &[f64] {
        &self.test_predictions
    }
}

/// Owns the two lazily trained models for one dataset.
pub struct ModelCache {
    dataset: Arc<Dataset>,
    split: SplitConfig,
    forest: ForestConfig,
    demand: OnceLock<Result<TrainedModel<LinearRegression>>>,
    satisfaction: OnceLock<Result<TrainedModel<RandomForest>>>,
    training_runs: AtomicUsize,
}

impl ModelCache {
    pub fn new(dataset: Arc<Dataset>, split: SplitConfig, forest: ForestConfig) -> Self {
        Self {
            dataset,
            split,
            forest,
            demand: OnceLock::new(),
            satisfaction: OnceLock::new(),
            training_runs: AtomicUsize::new(0),
        }
    }

    /// Linear model predicting `orders` from footfall, zone, and time slot.
    ///
    /// # Errors
    ///
    /// `InsufficientData` if the dataset is too small to split.
    pub fn demand(&self) -> Result<&TrainedModel<LinearRegression>> {
        self.demand
            .get_or_init(|| {
                self.train::<_, _, 3>(
                    "demand",
                    &DEMAND_FEATURES,
                    demand_features,
                    |r| f64::from(r.orders),
                    LinearRegression::fit,
                )
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Random forest predicting `satisfaction` from operational metrics.
    ///
    /// # Errors
    ///
    /// `InsufficientData` if the dataset is too small to split.
    pub fn satisfaction(&self) -> Result<&TrainedModel<RandomForest>> {
        let forest = &self.forest;
        self.satisfaction
            .get_or_init(|| {
                self.train::<_, _, 4>(
                    "satisfaction",
                    &SATISFACTION_FEATURES,
                    satisfaction_features,
                    |r| r.satisfaction,
                    |rows: &[[f64; 4]], y: &[f64]| RandomForest::fit(rows, y, forest),
                )
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Trains both models now instead of on first request.
    pub fn warm_up(&self) -> Result<()> {
        self.demand()?;
        self.satisfaction()?;
        Ok(())
    }

    /// Number of training runs performed so far (at most one per model).
    pub fn training_runs(&self) -> usize {
        self.training_runs.load(Ordering::SeqCst)
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    fn train<M, Fit, const F: usize>(
        &self,
        name: &'static str,
        feature_names: &'static [&'static str],
        features: fn(&Record) -> [f64; F],
        target: fn(&Record) -> f64,
        fit: Fit,
    ) -> Result<TrainedModel<M>>
    where
        M: Regressor,
        Fit: FnOnce(&[[f64; F]], &[f64]) -> M,
    {
        self.training_runs.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        let records = self.dataset.records();

        let split = train_test_split(records.len(), &self.split, name).inspect_err(|e| {
            warn!(model = name, error = %e, "model training failed");
        })?;

        let gather = |idx: &[usize]| -> (Vec<[f64; F]>, Vec<f64>) {
            idx.iter()
                .map(|&i| (features(&records[i]), target(&records[i])))
                .unzip()
        };
        let (x_train, y_train) = gather(&split.train);
        let (x_test, y_test) = gather(&split.test);

        let model = fit(&x_train, &y_train);
        let test_predictions = model.predict_rows(&x_test);
        let metrics = Metrics::evaluate(&y_test, &test_predictions);

        info!(
            model = name,
            train = split.train.len(),
            test = split.test.len(),
            r2 = metrics.r2,
            mae = metrics.mae,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model trained"
        );

        Ok(TrainedModel {
            model,
            metrics,
            feature_names,
            test_indices: split.test,
            test_predictions,
        })
    }
}
