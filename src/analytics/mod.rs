//! Read-only summary views computed from the processed dataset.
//!
//! Every view is a plain serializable struct built by a `compute` function
//! over `&Dataset` (plus model outputs where needed). Views hold no
//! references into the dataset.

pub mod congestion;
pub mod food;
pub mod interventions;
/// Headline KPI report.
pub mod kpi;
pub mod satisfaction;
pub mod transport;

pub use congestion::{CongestionView, HeatmapCell};
pub use food::FoodView;
pub use interventions::{Findings, InterventionsView, Priority};
pub use kpi::KpiReport;
pub use satisfaction::SatisfactionView;
pub use transport::TransportView;
