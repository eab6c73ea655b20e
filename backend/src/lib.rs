//! Crop Advisory Platform backend
//!
//! Yield prediction, rule-based soil, pest and irrigation advisories, and
//! season history for smallholder farmers, served over HTTP.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use shared::{SeasonHistory, YieldEstimator};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use crate::config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Backs the dashboard pipeline (crop_yield_v1 or the demo formula)
    pub dashboard_estimator: Arc<YieldEstimator>,
    /// Backs `/predict` (field_service_v1)
    pub service_estimator: Arc<YieldEstimator>,
    pub history: Arc<SeasonHistory>,
    pub mood: services::MoodClassifier,
}

impl AppState {
    /// Load both model artifacts and pick the mood classifier
    pub fn from_config(config: Config) -> Self {
        Self {
            dashboard_estimator: Arc::new(services::dashboard_estimator(&config.model)),
            service_estimator: Arc::new(services::service_estimator(&config.model)),
            history: Arc::new(SeasonHistory::builtin()),
            mood: services::MoodClassifier::from_config(&config.sentiment),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Advisory Platform API v1.0"
}
