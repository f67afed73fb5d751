//! Predictive models and their once-only training cache.

/// Lazily trained model cache.
pub mod cache;
pub mod forest;
pub mod linear;
/// Train/test partitioning and fit metrics.
pub mod split;

pub use cache::{ModelCache, TrainedModel};
pub use forest::RandomForest;
pub use linear::LinearRegression;
pub use split::Metrics;

/// A fitted model mapping a feature vector to a scalar prediction.
pub trait Regressor {
    /// Predicts the target for one feature vector (features in training order).
    fn predict(&self, features: &[f64]) -> f64;

    /// Predicts every row in order.
    fn predict_rows<R: AsRef<[f64]>>(&self, rows: &[R]) -> Vec<f64> {
        rows.iter().map(|r| self.predict(r.as_ref())).collect()
    }
}
