//! The processed, read-only record set shared for the process lifetime.

use crate::error::{EngineError, Result};

use super::record::Record;

/// Non-empty ordered sequence of processed records.
///
/// Constructed once by the pipeline and shared behind `Arc`; there is no
/// mutable access, so concurrent readers need no locking.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wraps processed records.
    ///
    /// # Errors
    ///
    /// `DataUnavailable` if `records` is empty.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(EngineError::data_unavailable(
                "<memory>",
                "contains no records",
            ));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean of recorded satisfaction.
    pub fn mean_satisfaction(&self) -> f64 {
        mean(self.iter().map(|r| r.satisfaction)).unwrap_or(0.0)
    }

    /// Mean congestion index over all records.
    pub fn mean_congestion(&self) -> f64 {
        mean(self.iter().map(|r| r.congestion_index)).unwrap_or(0.0)
    }

    /// Mean waste percent over records where it is defined.
    pub fn mean_waste_percent(&self) -> Option<f64> {
        mean(self.iter().filter_map(|r| r.waste_percent))
    }

    /// Mean transport utilization over records where it is defined.
    pub fn mean_utilization(&self) -> Option<f64> {
        mean(self.iter().filter_map(|r| r.transport_utilization))
    }

    /// Mean transport delay.
    pub fn mean_delay(&self) -> f64 {
        mean(self.iter().map(|r| r.avg_delay_min)).unwrap_or(0.0)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Arithmetic mean; `None` for an empty sequence.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{TimeSlot, Zone};
    use crate::testutil::record;

    #[test]
    fn empty_dataset_rejected() {
        assert!(matches!(
            Dataset::new(Vec::new()),
            Err(EngineError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn built_dataset_is_never_empty() {
        let ds = Dataset::new(vec![record(Zone::Library, TimeSlot::Morning, 50)]).unwrap();
        assert_eq!(ds.len(), 1);
        assert!(!ds.is_empty());
    }

    #[test]
    fn mean_of_sequence() {
        assert_eq!(mean([1.0, 2.0, 3.0, 6.0]), Some(3.0));
        assert_eq!(mean(std::iter::empty::<f64>()), None);
    }
}
