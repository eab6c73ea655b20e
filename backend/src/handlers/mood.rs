//! HTTP handlers for the farmer mood check-in

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::MoodCheckIn;

use crate::error::AppResult;
use crate::services::mood;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub text: String,
}

/// Classify how the farmer is feeling
pub async fn check_in(
    State(state): State<AppState>,
    Json(request): Json<MoodRequest>,
) -> AppResult<Json<MoodCheckIn>> {
    let result = mood::check_in(&state.mood, &request.text).await?;
    Ok(Json(result))
}
