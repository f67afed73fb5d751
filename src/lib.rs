//! Campus operations analytics: data pipeline, domain views, predictive
//! models, and what-if simulation.

/// Per-domain summary views.
pub mod analytics;
#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Raw and processed records, the pipeline, and the shared dataset.
pub mod data;
pub mod engine;
pub mod error;
pub mod io;
/// Demand and satisfaction models with their training cache.
pub mod model;
pub mod sim;

#[cfg(test)]
mod testutil;

pub use engine::CampusEngine;
pub use error::{EngineError, Result};
