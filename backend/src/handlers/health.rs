//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use shared::YieldEstimator;

use crate::AppState;

#[derive(Serialize)]
pub struct EstimatorStatus {
    pub schema: String,
    pub kind: String,
    pub loaded: bool,
}

impl From<&YieldEstimator> for EstimatorStatus {
    fn from(estimator: &YieldEstimator) -> Self {
        Self {
            schema: estimator.schema().id(),
            kind: estimator.kind().to_string(),
            loaded: estimator.is_loaded(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub dashboard_estimator: EstimatorStatus,
    pub service_estimator: EstimatorStatus,
    pub mood_classifier: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dashboard_estimator: state.dashboard_estimator.as_ref().into(),
        service_estimator: state.service_estimator.as_ref().into(),
        mood_classifier: state.mood.kind().to_string(),
    })
}
