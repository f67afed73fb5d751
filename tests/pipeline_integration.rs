//! Integration tests for loading and processing the fixture dataset.

mod common;

use campus_analytics::EngineError;
use campus_analytics::config::{DataConfig, ZeroDenominatorPolicy};
use campus_analytics::data::{DataPipeline, Zone};
use campus_analytics::io::export::write_csv;

fn load() -> campus_analytics::data::Dataset {
    let config = DataConfig {
        path: common::fixture_path().to_string_lossy().into_owned(),
        ..DataConfig::default()
    };
    DataPipeline::from_config(&config).run().expect("fixture loads")
}

#[test]
fn loads_every_row() {
    assert_eq!(load().len(), common::FIXTURE_ROWS);
}

#[test]
fn derived_fields_follow_definitions() {
    for r in load().iter() {
        assert_eq!(r.zone_capacity, r.zone.capacity());
        assert_eq!(
            r.congestion_index,
            f64::from(r.footfall) / f64::from(r.zone_capacity)
        );
        let waste = r.waste_percent.expect("fixture has no zero preparation");
        assert_eq!(
            waste,
            (f64::from(r.prepared_qty) - f64::from(r.orders)) / f64::from(r.prepared_qty)
        );
        assert!(waste <= 1.0);
        assert_eq!(
            r.transport_utilization,
            Some(f64::from(r.passengers) / f64::from(r.bus_capacity))
        );
        assert!(r.avg_delay_min >= 0.0);
    }
}

#[test]
fn missing_cells_are_filled() {
    let ds = load();
    let rows = ds.records();
    // medians over the non-missing cells of each column
    assert_eq!(rows[7].footfall, 174);
    assert_eq!(rows[7].zone, Zone::Hostel);
    assert_eq!(rows[19].avg_delay_min, 6.3);
    assert_eq!(rows[41].satisfaction, 2.82);
    // non-numeric incident count coerces to zero
    assert_eq!(rows[33].security_incidents, 0);
}

#[test]
fn missing_file_is_data_unavailable() {
    let pipeline = DataPipeline::new("does/not/exist.csv", ZeroDenominatorPolicy::Exclude);
    assert!(matches!(
        pipeline.run(),
        Err(EngineError::DataUnavailable { .. })
    ));
}

#[test]
fn exported_dataset_reloads_identically() {
    let loaded = load();
    let mut buf = Vec::new();
    write_csv(&loaded, &mut buf).expect("export");
    let reloaded = DataPipeline::new("export.csv", ZeroDenominatorPolicy::Exclude)
        .run_from_reader(buf.as_slice())
        .expect("reload");
    assert_eq!(reloaded.len(), loaded.len());
    for (a, b) in loaded.iter().zip(reloaded.iter()) {
        assert_eq!(a.zone, b.zone);
        assert_eq!(a.time_slot, b.time_slot);
        assert_eq!(a.date, b.date);
        assert_eq!(a.footfall, b.footfall);
        assert_eq!(a.orders, b.orders);
        assert_eq!(a.satisfaction, b.satisfaction);
    }
}
