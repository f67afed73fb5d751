//! API request, response, and error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Body of `POST /simulate`. Missing fields default to no reduction.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SimulateRequest {
    /// Percent cut in congestion index, `[0, 100]`.
    pub congestion_reduction: f64,
    /// Percent cut in transport delay, `[0, 100]`.
    pub delay_reduction: f64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Engine failure mapped onto an HTTP status.
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_is_bad_request() {
        let e = ApiError(EngineError::InvalidParameter {
            name: "delay_reduction",
            value: 140.0,
        });
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn training_failure_is_server_error() {
        let e = ApiError::from(EngineError::InsufficientData {
            model: "satisfaction",
            available: 3,
            required: 10,
        });
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn simulate_request_defaults_to_zero() {
        let req: SimulateRequest = serde_json::from_str(r#"{"delay_reduction": 20}"#).unwrap();
        assert_eq!(req.congestion_reduction, 0.0);
        assert_eq!(req.delay_reduction, 20.0);
    }
}
