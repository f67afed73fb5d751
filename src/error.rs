//! Error taxonomy for the analytics engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures raised while loading data, training models, or answering requests.
///
/// `Clone` so a training failure can be cached once and handed to every
/// caller that asks for the same model afterwards.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The source dataset is missing, unreadable, malformed, or empty.
    #[error("dataset unavailable ({}): {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A record references a zone absent from the capacity table.
    #[error("unknown zone \"{zone}\" in data row {row}")]
    UnknownZone { zone: String, row: usize },

    /// A record references a time slot outside the known slots.
    #[error("unknown time slot \"{slot}\" in data row {row}")]
    UnknownTimeSlot { slot: String, row: usize },

    /// A non-empty `Date` cell that is not a recognised calendar date.
    #[error("invalid date \"{date}\" in data row {row}")]
    InvalidDate { date: String, row: usize },

    /// Too few records to split into train and test partitions.
    #[error("insufficient data to train {model} model: {available} records, need at least {required}")]
    InsufficientData {
        model: &'static str,
        available: usize,
        required: usize,
    },

    /// A per-call parameter is outside its accepted range.
    #[error("invalid parameter `{name}`: {value} is outside [0, 100]")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A ratio column has a zero denominator and the pipeline is set to reject it.
    #[error("zero denominator for `{column}` in data row {row}")]
    DivisionPolicy { column: &'static str, row: usize },
}

impl EngineError {
    /// Create a `DataUnavailable` error for `path`.
    pub fn data_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error is the caller's fault rather than an engine failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let e = EngineError::UnknownZone {
            zone: "Rooftop".into(),
            row: 7,
        };
        assert_eq!(e.to_string(), "unknown zone \"Rooftop\" in data row 7");

        let e = EngineError::data_unavailable("data/missing.csv", "no such file");
        assert!(e.to_string().contains("data/missing.csv"));
    }

    #[test]
    fn only_invalid_parameter_is_client_error() {
        let bad = EngineError::InvalidParameter {
            name: "delay_reduction",
            value: 120.0,
        };
        assert!(bad.is_client_error());
        let fatal = EngineError::InsufficientData {
            model: "demand",
            available: 3,
            required: 10,
        };
        assert!(!fatal.is_client_error());
    }
}
