//! Zone × time-slot congestion heatmap and bottleneck detection.

use serde::Serialize;

use crate::data::{Dataset, TimeSlot, Zone};
use crate::data::dataset::mean;

/// Mean congestion of one (zone, time slot) group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub zone: Zone,
    pub time_slot: TimeSlot,
    pub congestion_index: f64,
}

/// Congestion summary across all records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CongestionView {
    /// Non-empty cells, zone-major then slot in enum order.
    pub heatmap: Vec<HeatmapCell>,
    /// Cells whose mean is at or above the bottleneck threshold.
    pub bottlenecks: Vec<HeatmapCell>,
    pub overall_avg_congestion: f64,
    pub most_congested_zone: Zone,
    pub most_congested_time_slot: TimeSlot,
    pub bottleneck_count: usize,
}

/// Running sum and count for a grouped mean.
#[derive(Debug, Clone, Copy, Default)]
struct Acc {
    sum: f64,
    n: usize,
}

impl Acc {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    fn mean(self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

impl CongestionView {
    /// Builds the heatmap and marginal rankings.
    ///
    /// # Arguments
    ///
    /// * `dataset` - Processed records
    /// * `threshold` - Minimum cell mean that counts as a bottleneck
    pub fn compute(dataset: &Dataset, threshold: f64) -> Self {
        let mut cells = [[Acc::default(); TimeSlot::ALL.len()]; Zone::ALL.len()];
        let mut zones = [Acc::default(); Zone::ALL.len()];
        let mut slots = [Acc::default(); TimeSlot::ALL.len()];

        for r in dataset {
            cells[r.zone.index()][r.time_slot.index()].push(r.congestion_index);
            zones[r.zone.index()].push(r.congestion_index);
            slots[r.time_slot.index()].push(r.congestion_index);
        }

        let heatmap: Vec<HeatmapCell> = Zone::ALL
            .iter()
            .flat_map(|&zone| {
                TimeSlot::ALL.iter().filter_map(move |&time_slot| {
                    cells[zone.index()][time_slot.index()]
                        .mean()
                        .map(|congestion_index| HeatmapCell {
                            zone,
                            time_slot,
                            congestion_index,
                        })
                })
            })
            .collect();

        let bottlenecks: Vec<HeatmapCell> = heatmap
            .iter()
            .filter(|c| c.congestion_index >= threshold)
            .copied()
            .collect();

        Self {
            bottleneck_count: bottlenecks.len(),
            heatmap,
            bottlenecks,
            overall_avg_congestion: mean(dataset.iter().map(|r| r.congestion_index))
                .unwrap_or(0.0),
            most_congested_zone: Zone::ALL[argmax(&zones)],
            most_congested_time_slot: TimeSlot::ALL[argmax(&slots)],
        }
    }

    /// Mean congestion of a zone over every heatmap cell it appears in.
    pub fn zone_cell_mean(&self, zone: Zone) -> Option<f64> {
        mean(
            self.heatmap
                .iter()
                .filter(|c| c.zone == zone)
                .map(|c| c.congestion_index),
        )
    }
}

/// Index of the largest defined mean; the first wins ties.
fn argmax(groups: &[Acc]) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, g) in groups.iter().enumerate() {
        if let Some(m) = g.mean() {
            if best.is_none_or(|(_, b)| m > b) {
                best = Some((i, m));
            }
        }
    }
    best.map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::record;

    fn two_zone_dataset() -> Dataset {
        let mut records = Vec::new();
        for slot in [TimeSlot::Morning, TimeSlot::Evening] {
            for _ in 0..3 {
                records.push(record(Zone::Sports, slot, 125));
                records.push(record(Zone::Hostel, slot, 375));
            }
        }
        Dataset::new(records).unwrap()
    }

    #[test]
    fn only_overloaded_cells_are_bottlenecks() {
        let view = CongestionView::compute(&two_zone_dataset(), 0.85);
        assert_eq!(view.heatmap.len(), 4);
        assert_eq!(view.bottleneck_count, 2);
        for cell in &view.bottlenecks {
            assert_eq!(cell.zone, Zone::Hostel);
            assert_eq!(cell.congestion_index, 1.25);
        }
        assert_eq!(view.most_congested_zone, Zone::Hostel);
        assert!((view.overall_avg_congestion - 0.875).abs() < 1e-12);
    }

    #[test]
    fn heatmap_is_zone_major_in_enum_order() {
        let view = CongestionView::compute(&two_zone_dataset(), 0.85);
        let order: Vec<(Zone, TimeSlot)> =
            view.heatmap.iter().map(|c| (c.zone, c.time_slot)).collect();
        assert_eq!(
            order,
            vec![
                (Zone::Hostel, TimeSlot::Morning),
                (Zone::Hostel, TimeSlot::Evening),
                (Zone::Sports, TimeSlot::Morning),
                (Zone::Sports, TimeSlot::Evening),
            ]
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        // 170 / 200 = 0.85 exactly
        let records = vec![
            record(Zone::Library, TimeSlot::Night, 170),
            record(Zone::Library, TimeSlot::Morning, 100),
        ];
        let view = CongestionView::compute(&Dataset::new(records).unwrap(), 0.85);
        assert_eq!(view.bottleneck_count, 1);
        assert_eq!(view.bottlenecks[0].time_slot, TimeSlot::Night);
    }

    #[test]
    fn ties_resolve_to_first_in_enum_order() {
        let records = vec![
            record(Zone::Sports, TimeSlot::Night, 125),
            record(Zone::Academic, TimeSlot::Afternoon, 125),
        ];
        let view = CongestionView::compute(&Dataset::new(records).unwrap(), 0.85);
        assert_eq!(view.most_congested_zone, Zone::Academic);
        assert_eq!(view.most_congested_time_slot, TimeSlot::Afternoon);
        assert!(view.bottlenecks.is_empty());
    }
}
