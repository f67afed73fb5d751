/// Processed dataset CSV export.
pub mod export;
