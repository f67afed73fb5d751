//! Request handlers for the API endpoints.
//!
//! Every handler is a pass-through to one [`CampusEngine`] operation.
//!
//! [`CampusEngine`]: crate::CampusEngine

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::analytics::{
    CongestionView, FoodView, InterventionsView, KpiReport, SatisfactionView, TransportView,
};
use crate::sim::SimulationResult;

use super::AppState;
use super::types::{ApiError, SimulateRequest};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// `GET /kpis`
pub async fn get_kpis(State(state): State<Arc<AppState>>) -> ApiResult<KpiReport> {
    Ok(Json(state.engine.kpis()?))
}

/// `GET /congestion`
pub async fn get_congestion(State(state): State<Arc<AppState>>) -> ApiResult<CongestionView> {
    Ok(Json(state.engine.congestion()?))
}

/// `GET /food-analysis`
pub async fn get_food_analysis(State(state): State<Arc<AppState>>) -> ApiResult<FoodView> {
    Ok(Json(state.engine.food_analysis()?))
}

/// `GET /transport-analysis`
pub async fn get_transport_analysis(
    State(state): State<Arc<AppState>>,
) -> ApiResult<TransportView> {
    Ok(Json(state.engine.transport_analysis()?))
}

/// `GET /satisfaction-impact`
pub async fn get_satisfaction_impact(
    State(state): State<Arc<AppState>>,
) -> ApiResult<SatisfactionView> {
    Ok(Json(state.engine.satisfaction_impact()?))
}

/// `GET /interventions`
pub async fn get_interventions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<InterventionsView> {
    Ok(Json(state.engine.interventions()?))
}

/// Projects satisfaction under the requested reductions.
///
/// `POST /simulate` → 200 + `SimulationResult` JSON
/// out-of-range reductions → 400 + `ErrorResponse`
pub async fn post_simulate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimulateRequest>,
) -> ApiResult<SimulationResult> {
    Ok(Json(
        state
            .engine
            .simulate(req.congestion_reduction, req.delay_reduction)?,
    ))
}
