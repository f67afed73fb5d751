//! Campus dataset: domains, records, and the processing pipeline.

pub mod dataset;
pub mod pipeline;
pub mod record;
/// Zone and time-slot domains with the capacity table.
pub mod zone;

pub use dataset::Dataset;
pub use pipeline::DataPipeline;
pub use record::{RawRecord, Record};
pub use zone::{TimeSlot, Zone};
