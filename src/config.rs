//! TOML-based engine configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level engine configuration parsed from TOML.
///
/// All fields have defaults matching the production settings. Load from
/// TOML with [`EngineConfig::from_toml_file`] or use
/// [`EngineConfig::default`] for the built-in settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Dataset location and cleaning policy.
    #[serde(default)]
    pub data: DataConfig,
    /// Train/test partitioning shared by both models.
    #[serde(default)]
    pub split: SplitConfig,
    /// Random forest hyperparameters for the satisfaction model.
    #[serde(default)]
    pub forest: ForestConfig,
    /// Congestion service parameters.
    #[serde(default)]
    pub congestion: CongestionConfig,
    /// Transport service parameters.
    #[serde(default)]
    pub transport: TransportConfig,
    /// Satisfaction service parameters.
    #[serde(default)]
    pub satisfaction: SatisfactionConfig,
}

/// How the pipeline treats a ratio whose denominator is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroDenominatorPolicy {
    /// Leave the derived ratio undefined and exclude it from means.
    #[default]
    Exclude,
    /// Fail the pipeline with a division policy error.
    Reject,
}

/// Dataset location and cleaning policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Path of the source CSV file.
    pub path: String,
    /// Policy for `prepared_qty = 0` and `bus_capacity = 0`.
    pub zero_denominator: ZeroDenominatorPolicy,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "data/dataset.csv".to_string(),
            zero_denominator: ZeroDenominatorPolicy::Exclude,
        }
    }
}

/// Train/test partitioning shared by both models.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Fraction of records held out for evaluation (exclusive 0.0–1.0).
    pub test_fraction: f64,
    /// Shuffle seed for the partition.
    pub seed: u64,
    /// Smallest dataset a model will train on.
    pub min_records: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            min_records: 10,
        }
    }
}

/// Random forest hyperparameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForestConfig {
    /// Number of trees in the ensemble (must be > 0).
    pub n_trees: usize,
    /// Maximum depth of each tree (must be > 0).
    pub max_depth: usize,
    /// Minimum samples a node needs before it is split (must be >= 2).
    pub min_samples_split: usize,
    /// Master seed for bootstrap sampling.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 150,
            max_depth: 12,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// Congestion service parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CongestionConfig {
    /// Mean congestion index at or above which a cell is a bottleneck.
    pub bottleneck_threshold: f64,
}

impl Default for CongestionConfig {
    fn default() -> Self {
        Self {
            bottleneck_threshold: 0.85,
        }
    }
}

/// Transport service parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportConfig {
    /// Maximum number of scatter points returned.
    pub scatter_limit: usize,
    /// Seed for the scatter sample.
    pub scatter_seed: u64,
    /// Utilization above which a run counts as overcrowded.
    pub overcrowded_threshold: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            scatter_limit: 500,
            scatter_seed: 42,
            overcrowded_threshold: 1.0,
        }
    }
}

/// Satisfaction service parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SatisfactionConfig {
    /// Number of predicted-vs-actual rows returned.
    pub comparison_limit: usize,
}

impl Default for SatisfactionConfig {
    fn default() -> Self {
        Self {
            comparison_limit: 100,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"split.test_fraction"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl EngineConfig {
    /// Returns the fast preset: a smaller forest for quick local runs.
    pub fn fast() -> Self {
        Self {
            forest: ForestConfig {
                n_trees: 25,
                max_depth: 8,
                ..ForestConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "fast"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "fast" => Ok(Self::fast()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.data.path.trim().is_empty() {
            errors.push(ConfigError {
                field: "data.path".into(),
                message: "must not be empty".into(),
            });
        }

        let s = &self.split;
        if !(s.test_fraction > 0.0 && s.test_fraction < 1.0) {
            errors.push(ConfigError {
                field: "split.test_fraction".into(),
                message: "must be in (0.0, 1.0)".into(),
            });
        }
        if s.min_records < 4 {
            errors.push(ConfigError {
                field: "split.min_records".into(),
                message: "must be >= 4".into(),
            });
        }

        let f = &self.forest;
        if f.n_trees == 0 {
            errors.push(ConfigError {
                field: "forest.n_trees".into(),
                message: "must be > 0".into(),
            });
        }
        if f.max_depth == 0 {
            errors.push(ConfigError {
                field: "forest.max_depth".into(),
                message: "must be > 0".into(),
            });
        }
        if f.min_samples_split < 2 {
            errors.push(ConfigError {
                field: "forest.min_samples_split".into(),
                message: "must be >= 2".into(),
            });
        }

        if !self.congestion.bottleneck_threshold.is_finite()
            || self.congestion.bottleneck_threshold < 0.0
        {
            errors.push(ConfigError {
                field: "congestion.bottleneck_threshold".into(),
                message: "must be a finite value >= 0".into(),
            });
        }

        let t = &self.transport;
        if t.scatter_limit == 0 {
            errors.push(ConfigError {
                field: "transport.scatter_limit".into(),
                message: "must be > 0".into(),
            });
        }
        if !t.overcrowded_threshold.is_finite() || t.overcrowded_threshold <= 0.0 {
            errors.push(ConfigError {
                field: "transport.overcrowded_threshold".into(),
                message: "must be a finite value > 0".into(),
            });
        }

        errors
    }
}
