//! Headline campus KPIs.

use std::fmt;

use serde::Serialize;

use crate::data::Dataset;

/// Campus-wide key performance indicators.
///
/// Means over ratios skip records where the ratio is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    /// Number of processed records.
    pub total_records: usize,
    /// Mean recorded satisfaction (1-5 nominal).
    pub avg_satisfaction: f64,
    /// Mean footfall over zone capacity.
    pub avg_congestion_index: f64,
    /// Mean unsold fraction of prepared food.
    pub avg_waste_percent: Option<f64>,
    /// Mean passengers over bus capacity.
    pub avg_transport_utilization: Option<f64>,
    /// Mean transport delay (minutes).
    pub avg_delay_min: f64,
    /// Held-out R² of the demand model.
    pub food_model_r2: f64,
    /// Held-out R² of the satisfaction model.
    pub satisfaction_model_r2: f64,
}

impl KpiReport {
    /// Computes all KPIs from the dataset and the two model scores.
    ///
    /// # Arguments
    ///
    /// * `dataset` - Processed records
    /// * `food_model_r2` - Demand model R² on its test partition
    /// * `satisfaction_model_r2` - Satisfaction model R² on its test partition
    pub fn compute(dataset: &Dataset, food_model_r2: f64, satisfaction_model_r2: f64) -> Self {
        Self {
            total_records: dataset.len(),
            avg_satisfaction: dataset.mean_satisfaction(),
            avg_congestion_index: dataset.mean_congestion(),
            avg_waste_percent: dataset.mean_waste_percent(),
            avg_transport_utilization: dataset.mean_utilization(),
            avg_delay_min: dataset.mean_delay(),
            food_model_r2,
            satisfaction_model_r2,
        }
    }
}

struct Pct(Option<f64>);

impl fmt::Display for Pct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.1}%", v * 100.0),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Campus KPIs ---")?;
        writeln!(f, "Records:               {}", self.total_records)?;
        writeln!(f, "Avg satisfaction:      {:.2} / 5", self.avg_satisfaction)?;
        writeln!(f, "Avg congestion index:  {:.3}", self.avg_congestion_index)?;
        writeln!(f, "Avg food waste:        {}", Pct(self.avg_waste_percent))?;
        writeln!(
            f,
            "Avg bus utilization:   {}",
            Pct(self.avg_transport_utilization)
        )?;
        writeln!(f, "Avg transport delay:   {:.2} min", self.avg_delay_min)?;
        write!(
            f,
            "Model R²:              demand {:.3}, satisfaction {:.3}",
            self.food_model_r2, self.satisfaction_model_r2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{TimeSlot, Zone};
    use crate::testutil::{record, refresh};

    #[test]
    fn averages_over_records() {
        let mut a = record(Zone::Library, TimeSlot::Morning, 100);
        a.satisfaction = 4.0;
        let mut b = record(Zone::Library, TimeSlot::Night, 200);
        b.satisfaction = 3.0;
        b.bus_capacity = 0;
        refresh(&mut b);

        let kpi = KpiReport::compute(&Dataset::new(vec![a, b]).unwrap(), 0.8, 0.6);
        assert_eq!(kpi.total_records, 2);
        assert_eq!(kpi.avg_satisfaction, 3.5);
        assert_eq!(kpi.avg_congestion_index, 0.75);
        assert_eq!(kpi.avg_transport_utilization, Some(0.75));
        assert_eq!(kpi.food_model_r2, 0.8);
    }

    #[test]
    fn display_contains_all_sections() {
        let a = record(Zone::Sports, TimeSlot::Evening, 50);
        let kpi = KpiReport::compute(&Dataset::new(vec![a]).unwrap(), 0.5, 0.25);
        let text = kpi.to_string();
        assert!(text.contains("Records:               1"));
        assert!(text.contains("Avg food waste:        20.0%"));
        assert!(text.contains("satisfaction 0.250"));
    }
}
