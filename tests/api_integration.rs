//! Integration tests for the REST API over the fixture dataset.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use campus_analytics::api::{AppState, router};
use serde_json::Value;
use tower::util::ServiceExt;

fn state() -> Arc<AppState> {
    Arc::new(AppState {
        engine: Arc::new(common::fixture_engine()),
    })
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(Arc::clone(state)).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn simulate(state: &Arc<AppState>, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/simulate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = router(Arc::clone(state)).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn congestion_contract() {
    let state = state();
    let (status, json) = get(&state, "/congestion").await;
    assert_eq!(status, StatusCode::OK);
    for key in [
        "heatmap",
        "bottlenecks",
        "overall_avg_congestion",
        "most_congested_zone",
        "most_congested_time_slot",
        "bottleneck_count",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["bottleneck_count"], 5);
    assert_eq!(json["most_congested_time_slot"], "Evening");
    let cell = &json["heatmap"][0];
    assert!(cell.get("zone").is_some());
    assert!(cell.get("time_slot").is_some());
    assert!(cell.get("congestion_index").is_some());
}

#[tokio::test]
async fn analysis_contracts() {
    let state = state();

    let (_, food) = get(&state, "/food-analysis").await;
    for key in ["overall_waste_percent", "total_waste_qty", "by_meal_type", "by_zone", "waste_trend"] {
        assert!(food.get(key).is_some(), "food missing {key}");
    }
    assert!(food["demand_model"].get("r2").is_some());
    assert!(food["demand_model"].get("mae").is_some());

    let (_, transport) = get(&state, "/transport-analysis").await;
    assert_eq!(transport["scatter"].as_array().map(Vec::len), Some(60));
    assert!(transport["scatter"][0].get("utilization").is_some());
    assert!(transport["scatter"][0].get("delay").is_some());

    let (_, sat) = get(&state, "/satisfaction-impact").await;
    assert!(sat.get("r2_score").is_some());
    assert_eq!(sat["feature_importance"].as_array().map(Vec::len), Some(4));
    assert!(sat["comparison"][0].get("predicted").is_some());
    assert!(sat["comparison"][0].get("actual").is_some());

    let (_, interventions) = get(&state, "/interventions").await;
    assert!(interventions["summary"].get("total_interventions").is_some());
    assert!(interventions["interventions"].as_array().is_some_and(|a| !a.is_empty()));
}

#[tokio::test]
async fn simulate_contract_and_defaults() {
    let state = state();
    let (status, json) = simulate(&state, "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["congestion_reduction_pct"], 0.0);
    assert_eq!(json["delay_reduction_pct"], 0.0);
    for key in ["baseline_satisfaction", "projected_satisfaction", "improvement_pct"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }

    let (status, json) = simulate(&state, r#"{"congestion_reduction": 30, "delay_reduction": 20}"#).await;
    assert_eq!(status, StatusCode::OK);
    let baseline = state.engine.dataset().mean_satisfaction();
    let reported = json["baseline_satisfaction"].as_f64().unwrap();
    assert!((reported - baseline).abs() < 1e-9);
}

#[tokio::test]
async fn simulate_rejects_out_of_range() {
    let state = state();
    let (status, json) = simulate(&state, r#"{"delay_reduction": -5}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("delay_reduction")));
}
