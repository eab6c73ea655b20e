//! Shared helpers for the backend integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use crop_advisory_backend::{
    create_app,
    services::mood::{KeywordClassifier, MoodClassifier},
    services::regressor::{BoostingParams, GradientBoostedRegressor},
    AppState, Config,
};
use serde_json::Value;
use shared::{FeatureSchema, SeasonHistory, YieldEstimator};
use tower::ServiceExt;

pub const CURRENT_YEAR: i32 = 2024;

pub fn state(dashboard: YieldEstimator, service: YieldEstimator) -> AppState {
    let mut config = Config::default();
    config.history.current_year = Some(CURRENT_YEAR);

    AppState {
        config: Arc::new(config),
        dashboard_estimator: Arc::new(dashboard),
        service_estimator: Arc::new(service),
        history: Arc::new(SeasonHistory::builtin()),
        mood: MoodClassifier::Keyword(KeywordClassifier),
    }
}

/// App with no trained artifacts loaded
pub fn unloaded_app() -> Router {
    create_app(state(
        YieldEstimator::unavailable(FeatureSchema::crop_yield_v1()),
        YieldEstimator::unavailable(FeatureSchema::field_service_v1()),
    ))
}

/// Service model predicting a constant yield for every input
pub fn constant_service_model(value: f64) -> GradientBoostedRegressor {
    let features = vec![
        vec![100.0, 20.0, 0.0],
        vec![200.0, 25.0, 1.0],
        vec![300.0, 30.0, 2.0],
    ];
    GradientBoostedRegressor::fit(
        FeatureSchema::field_service_v1(),
        &features,
        &[value; 3],
        BoostingParams {
            n_estimators: 1,
            learning_rate: 1.0,
            ..BoostingParams::default()
        },
    )
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
