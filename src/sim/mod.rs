//! What-if simulation over the satisfaction model.

pub mod engine;
/// Validated scenario parameters.
pub mod scenario;

pub use engine::{SimulationEngine, SimulationResult};
pub use scenario::Scenario;
