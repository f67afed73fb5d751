//! Transport load, delay, and scatter sampling.

use rand::{SeedableRng, rngs::StdRng, seq::index::sample};
use serde::Serialize;

use crate::config::TransportConfig;
use crate::data::{Dataset, Record, TimeSlot, Zone};
use crate::data::dataset::mean;

/// One utilization/delay observation for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub zone: Zone,
    pub time_slot: TimeSlot,
    pub utilization: Option<f64>,
    pub delay: f64,
}

/// Transport figures for one zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneTransport {
    pub zone: Zone,
    pub avg_utilization: Option<f64>,
    pub avg_delay: f64,
    pub total_passengers: u64,
}

/// Transport summary across all records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportView {
    pub avg_utilization: Option<f64>,
    pub avg_delay_min: f64,
    pub max_delay_min: f64,
    /// Percent of runs with defined utilization above the threshold.
    pub overcrowded_pct: f64,
    pub scatter: Vec<ScatterPoint>,
    pub by_zone: Vec<ZoneTransport>,
}

impl TransportView {
    pub fn compute(dataset: &Dataset, config: &TransportConfig) -> Self {
        let utilizations: Vec<f64> = dataset
            .iter()
            .filter_map(|r| r.transport_utilization)
            .collect();
        let overcrowded = utilizations
            .iter()
            .filter(|&&u| u > config.overcrowded_threshold)
            .count();
        let overcrowded_pct = if utilizations.is_empty() {
            0.0
        } else {
            overcrowded as f64 / utilizations.len() as f64 * 100.0
        };

        Self {
            avg_utilization: mean(utilizations.iter().copied()),
            avg_delay_min: dataset.mean_delay(),
            max_delay_min: dataset
                .iter()
                .map(|r| r.avg_delay_min)
                .fold(0.0, f64::max),
            overcrowded_pct,
            scatter: scatter(dataset.records(), config.scatter_limit, config.scatter_seed),
            by_zone: by_zone(dataset),
        }
    }
}

/// Every record when there are at most `limit`, otherwise a seeded sample
/// without replacement, kept in dataset order.
fn scatter(records: &[Record], limit: usize, seed: u64) -> Vec<ScatterPoint> {
    let point = |r: &Record| ScatterPoint {
        zone: r.zone,
        time_slot: r.time_slot,
        utilization: r.transport_utilization,
        delay: r.avg_delay_min,
    };
    if records.len() <= limit {
        return records.iter().map(point).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = sample(&mut rng, records.len(), limit).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| point(&records[i])).collect()
}

fn by_zone(dataset: &Dataset) -> Vec<ZoneTransport> {
    Zone::ALL
        .iter()
        .filter_map(|&zone| {
            let rows: Vec<&Record> = dataset.iter().filter(|r| r.zone == zone).collect();
            if rows.is_empty() {
                return None;
            }
            Some(ZoneTransport {
                zone,
                avg_utilization: mean(rows.iter().filter_map(|r| r.transport_utilization)),
                avg_delay: mean(rows.iter().map(|r| r.avg_delay_min)).unwrap_or(0.0),
                total_passengers: rows.iter().map(|r| u64::from(r.passengers)).sum(),
            })
        })
        .collect()
}
