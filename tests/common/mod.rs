//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use campus_analytics::CampusEngine;
use campus_analytics::config::EngineConfig;
use campus_analytics::data::{Dataset, Record, TimeSlot, Zone};

/// Rows in `fixtures/campus_small.csv`.
pub const FIXTURE_ROWS: usize = 60;

/// Path of the 60-row campus fixture (5 dates, every zone and slot, a few
/// missing cells).
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("campus_small.csv")
}

/// Fast preset pointed at the fixture.
pub fn fixture_config() -> EngineConfig {
    let mut config = EngineConfig::fast();
    config.data.path = fixture_path().to_string_lossy().into_owned();
    config
}

/// Engine loaded from the fixture with the fast preset.
pub fn fixture_engine() -> CampusEngine {
    CampusEngine::load(fixture_config()).expect("fixture loads")
}

/// Record with consistent derived fields and neutral operational values.
pub fn record(zone: Zone, time_slot: TimeSlot, footfall: u32, satisfaction: f64) -> Record {
    let capacity = zone.capacity();
    Record {
        date: None,
        zone,
        time_slot,
        meal_type: "Lunch".to_string(),
        footfall,
        prepared_qty: 100,
        orders: 75,
        passengers: 30,
        bus_capacity: 40,
        avg_delay_min: 6.0,
        response_time_hr: 2.0,
        satisfaction,
        security_incidents: 0,
        zone_capacity: capacity,
        congestion_index: f64::from(footfall) / f64::from(capacity),
        waste_percent: Some(0.25),
        transport_utilization: Some(0.75),
        zone_encoded: zone.encoded(),
        time_slot_encoded: time_slot.encoded(),
    }
}

/// Two zones over two slots: Sports at congestion 0.5, Hostel at 1.25.
pub fn two_zone_dataset() -> Dataset {
    let mut records = Vec::new();
    for i in 0..24 {
        let slot = if i % 2 == 0 {
            TimeSlot::Morning
        } else {
            TimeSlot::Evening
        };
        records.push(record(Zone::Sports, slot, 125, 4.2));
        records.push(record(Zone::Hostel, slot, 375, 2.6));
    }
    Dataset::new(records).expect("non-empty")
}

/// Satisfaction driven only by congestion; every other input is constant.
pub fn monotone_dataset() -> Dataset {
    let records = (0..80)
        .map(|i| {
            let zone = Zone::ALL[i % Zone::ALL.len()];
            let footfall = 20 + (i as u32 * 7) % 260;
            let mut r = record(zone, TimeSlot::ALL[i % TimeSlot::ALL.len()], footfall, 0.0);
            r.satisfaction = 5.0 - 1.5 * r.congestion_index;
            r
        })
        .collect();
    Dataset::new(records).expect("non-empty")
}
