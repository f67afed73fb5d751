//! Hypothetical intervention parameters.

use serde::Serialize;

use crate::error::{EngineError, Result};

/// Percentage reductions applied to the satisfaction model inputs.
///
/// Both values are validated to lie in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scenario {
    congestion_reduction_pct: f64,
    delay_reduction_pct: f64,
}

impl Scenario {
    /// The unmodified dataset.
    pub const BASELINE: Scenario = Scenario {
        congestion_reduction_pct: 0.0,
        delay_reduction_pct: 0.0,
    };

    /// # Errors
    ///
    /// `InvalidParameter` if either value is NaN or outside `[0, 100]`.
    pub fn new(congestion_reduction_pct: f64, delay_reduction_pct: f64) -> Result<Self> {
        Ok(Self {
            congestion_reduction_pct: check("congestion_reduction", congestion_reduction_pct)?,
            delay_reduction_pct: check("delay_reduction", delay_reduction_pct)?,
        })
    }

    pub fn congestion_reduction_pct(&self) -> f64 {
        self.congestion_reduction_pct
    }

    pub fn delay_reduction_pct(&self) -> f64 {
        self.delay_reduction_pct
    }

    /// Scales congestion and delay in a satisfaction feature vector.
    ///
    /// Feature order is congestion, delay, waste, response time.
    pub fn apply(&self, mut features: [f64; 4]) -> [f64; 4] {
        features[0] *= 1.0 - self.congestion_reduction_pct / 100.0;
        features[1] *= 1.0 - self.delay_reduction_pct / 100.0;
        features
    }
}

fn check(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(EngineError::InvalidParameter { name, value })
    }
}
