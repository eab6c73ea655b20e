//! Route definitions for the Crop Advisory Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route("/dashboard", post(handlers::get_dashboard))
        .route("/advisories", post(handlers::get_advisories))
        .nest("/seasons", season_routes())
        .route("/mood", post(handlers::check_in))
}

/// Season history routes
fn season_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::list_seasons))
        .route("/:year", post(handlers::get_season))
}
