//! Satisfaction model explanation: importances and held-out comparison.

use serde::Serialize;

use crate::data::Dataset;
use crate::model::{RandomForest, TrainedModel};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub importance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub predicted: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionView {
    pub r2_score: f64,
    pub mae: f64,
    /// One entry per model input, most important first.
    pub feature_importance: Vec<FeatureImportance>,
    /// Held-out rows in split order, at most `comparison_limit`.
    pub comparison: Vec<Comparison>,
}

impl SatisfactionView {
    pub fn compute(
        dataset: &Dataset,
        model: &TrainedModel<RandomForest>,
        comparison_limit: usize,
    ) -> Self {
        Self {
            r2_score: model.metrics.r2,
            mae: model.metrics.mae,
            feature_importance: ranked_importances(model),
            comparison: model
                .test_indices()
                .iter()
                .zip(model.test_predictions())
                .take(comparison_limit)
                .map(|(&i, &predicted)| Comparison {
                    predicted,
                    actual: dataset.records()[i].satisfaction,
                })
                .collect(),
        }
    }
}

/// Importances sorted descending; equal weights keep feature order.
pub fn ranked_importances(model: &TrainedModel<RandomForest>) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = model
        .feature_names
        .iter()
        .zip(model.model.feature_importances())
        .map(|(&feature, &importance)| FeatureImportance {
            feature,
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{ForestConfig, SplitConfig};
    use crate::data::{TimeSlot, Zone};
    use crate::model::ModelCache;
    use crate::model::cache::SATISFACTION_FEATURES;
    use crate::testutil::record;

    fn cache(n: usize) -> ModelCache {
        let records = (0..n)
            .map(|i| {
                let mut r = record(Zone::ALL[i % 5], TimeSlot::ALL[i % 4], 20 + (i as u32 * 7) % 280);
                r.satisfaction = 5.0 - 2.0 * r.congestion_index;
                r
            })
            .collect();
        let forest = ForestConfig {
            n_trees: 8,
            max_depth: 5,
            ..ForestConfig::default()
        };
        ModelCache::new(
            Arc::new(Dataset::new(records).unwrap()),
            SplitConfig::default(),
            forest,
        )
    }

    #[test]
    fn importances_sorted_and_complete() {
        let cache = cache(50);
        let view = SatisfactionView::compute(cache.dataset(), cache.satisfaction().unwrap(), 100);
        assert_eq!(view.feature_importance.len(), SATISFACTION_FEATURES.len());
        for pair in view.feature_importance.windows(2) {
            assert!(pair[0].importance >= pair[1].importance);
        }
        let total: f64 = view.feature_importance.iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-9);
        // only congestion varies with the target
        assert_eq!(view.feature_importance[0].feature, "congestion_index");
    }

    #[test]
    fn comparison_matches_held_out_rows() {
        let cache = cache(50);
        let model = cache.satisfaction().unwrap();
        let view = SatisfactionView::compute(cache.dataset(), model, 100);
        assert_eq!(view.comparison.len(), 10);
        let first = model.test_indices()[0];
        assert_eq!(view.comparison[0].actual, cache.dataset().records()[first].satisfaction);
        assert_eq!(view.comparison[0].predicted, model.test_predictions()[0]);

        let limited = SatisfactionView::compute(cache.dataset(), model, 3);
        assert_eq!(limited.comparison.len(), 3);
    }
}
