//! HTTP handlers for the dashboard pipeline

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use shared::{AdvisoryLines, AdvisoryResult, InputRecord, SeasonRecord};

use crate::error::AppResult;
use crate::services::dashboard::{DashboardReport, DashboardRequest, DashboardService};
use crate::AppState;

fn dashboard_service(state: &AppState) -> DashboardService {
    DashboardService::new(
        state.dashboard_estimator.clone(),
        state.history.clone(),
        state.config.current_year(),
    )
}

/// Full dashboard for one set of inputs
pub async fn get_dashboard(
    State(state): State<AppState>,
    Json(request): Json<DashboardRequest>,
) -> AppResult<Json<DashboardReport>> {
    let report = dashboard_service(&state).evaluate(&request)?;
    Ok(Json(report))
}

#[derive(Serialize)]
pub struct AdvisoryResponse {
    pub advisories: AdvisoryResult,
    pub lines: AdvisoryLines,
}

/// Fertilizer, pest and irrigation advisories
pub async fn get_advisories(
    State(state): State<AppState>,
    Json(input): Json<InputRecord>,
) -> AppResult<Json<AdvisoryResponse>> {
    let (advisories, lines) = dashboard_service(&state).advisories(&input)?;
    Ok(Json(AdvisoryResponse { advisories, lines }))
}

/// All seasons including the current one
pub async fn list_seasons(
    State(state): State<AppState>,
    Json(input): Json<InputRecord>,
) -> AppResult<Json<BTreeMap<i32, SeasonRecord>>> {
    let seasons = dashboard_service(&state).seasons(&input)?;
    Ok(Json(seasons))
}

/// Detail for one season year
pub async fn get_season(
    State(state): State<AppState>,
    Path(year): Path<i32>,
    Json(input): Json<InputRecord>,
) -> AppResult<Json<SeasonRecord>> {
    let season = dashboard_service(&state).season(year, &input)?;
    Ok(Json(season))
}
