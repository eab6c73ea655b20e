//! Prediction endpoint
//!
//! Always answers 200 with either `{predicted_yield}` or `{error}`.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use shared::{round_to, EstimateError, FeatureKey, FeatureSource};

use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub rainfall: f64,
    pub temperature: f64,
    #[serde(default)]
    pub pesticide: f64,
}

impl FeatureSource for PredictRequest {
    fn feature(&self, key: FeatureKey) -> Option<f64> {
        match key {
            FeatureKey::Rainfall => Some(self.rainfall),
            FeatureKey::Temperature => Some(self.temperature),
            FeatureKey::Pesticide => Some(self.pesticide),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PredictResponse {
    Prediction { predicted_yield: f64 },
    Error { error: String },
}

/// Predict yield from rainfall, temperature and pesticide
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Json<PredictResponse> {
    let estimator = &state.service_estimator;

    let result = estimator
        .schema()
        .build(&request)
        .map_err(|e| EstimateError::PredictionFailed(e.to_string()))
        .and_then(|features| estimator.predict(&features));

    let response = match result {
        Ok(value) => PredictResponse::Prediction {
            predicted_yield: round_to(value, 2),
        },
        Err(e) => {
            tracing::warn!("Prediction request failed: {}", e);
            PredictResponse::Error {
                error: e.to_string(),
            }
        }
    };
    Json(response)
}
