//! Integration tests for the domain views over the fixture and synthetic data.

mod common;

use campus_analytics::CampusEngine;
use campus_analytics::analytics::Priority;
use campus_analytics::config::EngineConfig;
use campus_analytics::data::{TimeSlot, Zone};

#[test]
fn fixture_congestion_flags_evening_cells() {
    let engine = common::fixture_engine();
    let view = engine.congestion().unwrap();

    assert_eq!(view.heatmap.len(), 20);
    assert_eq!(view.bottleneck_count, 5);
    for cell in &view.bottlenecks {
        assert_eq!(cell.time_slot, TimeSlot::Evening);
    }
    // bottlenecks are exactly the cells at or above the threshold
    let expected: Vec<_> = view
        .heatmap
        .iter()
        .filter(|c| c.congestion_index >= 0.85)
        .copied()
        .collect();
    assert_eq!(view.bottlenecks, expected);
    assert_eq!(view.most_congested_time_slot, TimeSlot::Evening);
}

#[test]
fn two_zone_scenario_bottlenecks_only_overloaded_zone() {
    let engine = CampusEngine::from_dataset(EngineConfig::fast(), common::two_zone_dataset());
    let view = engine.congestion().unwrap();
    assert_eq!(view.heatmap.len(), 4);
    assert_eq!(view.bottleneck_count, 2);
    assert!(view.bottlenecks.iter().all(|c| c.zone == Zone::Hostel));
    assert!(view.bottlenecks.iter().all(|c| c.congestion_index == 1.25));
    assert_eq!(view.most_congested_zone, Zone::Hostel);
}

#[test]
fn fixture_food_totals() {
    let engine = common::fixture_engine();
    let food = engine.food_analysis().unwrap();
    assert_eq!(food.total_waste_qty, 1450);
    assert_eq!(food.by_meal_type.len(), 4);
    assert_eq!(food.by_zone.len(), 5);
    // every record is dated, so the trend is daily
    assert_eq!(food.waste_trend.len(), 5);
    assert_eq!(food.waste_trend[0].period, "2024-03-01");
    let trend_total: i64 = food.waste_trend.iter().map(|t| t.total_waste).sum();
    assert_eq!(trend_total, food.total_waste_qty);
    assert!(food.demand_model.mae.is_finite());
}

#[test]
fn fixture_transport_scatter_covers_small_dataset() {
    let engine = common::fixture_engine();
    let transport = engine.transport_analysis().unwrap();
    assert_eq!(transport.scatter.len(), common::FIXTURE_ROWS.min(500));
    assert!((transport.overcrowded_pct - 30.0).abs() < 1e-9);
    assert_eq!(transport.by_zone.len(), 5);
    assert!(transport.max_delay_min >= transport.avg_delay_min);
}

#[test]
fn fixture_satisfaction_importances_sum_to_one() {
    let engine = common::fixture_engine();
    let view = engine.satisfaction_impact().unwrap();
    let total: f64 = view.feature_importance.iter().map(|f| f.importance).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(view.feature_importance.len(), 4);
    // ceil(60 * 0.2) held-out rows
    assert_eq!(view.comparison.len(), 12);
}

#[test]
fn fixture_interventions_are_ranked() {
    let engine = common::fixture_engine();
    let view = engine.interventions().unwrap();
    assert_eq!(view.summary.total_interventions, view.interventions.len());
    let ids: Vec<&str> = view.interventions.iter().map(|i| i.id).collect();
    for id in ["cong-1", "cong-2", "food-1", "food-2", "trans-1", "trans-2", "sat-1", "sat-2"] {
        assert!(ids.contains(&id), "missing {id}");
    }
    let ranks: Vec<Priority> = view.interventions.iter().map(|i| i.priority).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn kpis_match_dataset_means() {
    let engine = common::fixture_engine();
    let kpi = engine.kpis().unwrap();
    assert_eq!(kpi.total_records, common::FIXTURE_ROWS);
    assert_eq!(kpi.avg_satisfaction, engine.dataset().mean_satisfaction());
    assert_eq!(kpi.avg_waste_percent, engine.dataset().mean_waste_percent());
    assert!(kpi.to_string().contains("Records:               60"));
}
