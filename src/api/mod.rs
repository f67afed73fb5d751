//! REST API over the analytics engine.
//!
//! Read endpoints:
//! - `/kpis`, `/congestion`, `/food-analysis`, `/transport-analysis`
//! - `/satisfaction-impact`, `/interventions`
//!
//! plus `POST /simulate` for what-if projections.

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::CampusEngine;

pub use types::{ErrorResponse, SimulateRequest};

/// Application state shared across all request handlers.
///
/// The engine is read-only after startup, so no locks are needed.
pub struct AppState {
    pub engine: Arc<CampusEngine>,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/kpis", get(handlers::get_kpis))
        .route("/congestion", get(handlers::get_congestion))
        .route("/food-analysis", get(handlers::get_food_analysis))
        .route("/transport-analysis", get(handlers::get_transport_analysis))
        .route("/satisfaction-impact", get(handlers::get_satisfaction_impact))
        .route("/interventions", get(handlers::get_interventions))
        .route("/simulate", post(handlers::post_simulate))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns the I/O error if the listener cannot bind or the server stops
/// abnormally.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
