//! What-if re-scoring of the dataset under a hypothetical scenario.

use serde::Serialize;
use tracing::debug;

use crate::data::Dataset;
use crate::error::Result;
use crate::model::cache::satisfaction_features;
use crate::model::{RandomForest, Regressor, TrainedModel};

use super::scenario::Scenario;

/// Projected satisfaction for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Mean recorded satisfaction.
    pub baseline_satisfaction: f64,
    /// Mean model prediction over the adjusted feature vectors.
    pub projected_satisfaction: f64,
    /// Relative change from baseline in percent; 0 for a zero baseline.
    pub improvement_pct: f64,
    pub congestion_reduction_pct: f64,
    pub delay_reduction_pct: f64,
}

/// Borrows the dataset and the trained satisfaction model.
///
/// Scenarios are applied to copies of each feature vector; the dataset is
/// never modified.
pub struct SimulationEngine<'a> {
    dataset: &'a Dataset,
    model: &'a TrainedModel<RandomForest>,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(dataset: &'a Dataset, model: &'a TrainedModel<RandomForest>) -> Self {
        Self { dataset, model }
    }

    /// Validates the reductions and projects satisfaction.
    ///
    /// # Arguments
    ///
    /// * `congestion_reduction_pct` - Percent cut in congestion index, `[0, 100]`
    /// * `delay_reduction_pct` - Percent cut in transport delay, `[0, 100]`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if either value is NaN or out of range.
    pub fn simulate(
        &self,
        congestion_reduction_pct: f64,
        delay_reduction_pct: f64,
    ) -> Result<SimulationResult> {
        let scenario = Scenario::new(congestion_reduction_pct, delay_reduction_pct)?;
        Ok(self.run(&scenario))
    }

    /// Projects satisfaction for an already validated scenario.
    pub fn run(&self, scenario: &Scenario) -> SimulationResult {
        let baseline = self.dataset.mean_satisfaction();
        let projected = self.mean_prediction(scenario);
        let improvement_pct = if baseline == 0.0 {
            0.0
        } else {
            (projected - baseline) / baseline * 100.0
        };
        debug!(
            congestion = scenario.congestion_reduction_pct(),
            delay = scenario.delay_reduction_pct(),
            baseline,
            projected,
            "scenario simulated"
        );
        SimulationResult {
            baseline_satisfaction: baseline,
            projected_satisfaction: projected,
            improvement_pct,
            congestion_reduction_pct: scenario.congestion_reduction_pct(),
            delay_reduction_pct: scenario.delay_reduction_pct(),
        }
    }

    /// Mean model prediction on the unmodified dataset.
    pub fn predicted_baseline(&self) -> f64 {
        self.mean_prediction(&Scenario::BASELINE)
    }

    fn mean_prediction(&self, scenario: &Scenario) -> f64 {
        let total: f64 = self
            .dataset
            .iter()
            .map(|r| self.model.model.predict(&scenario.apply(satisfaction_features(r))))
            .sum();
        total / self.dataset.len() as f64
    }
}
