//! Business logic services for the Crop Advisory Platform

pub mod dashboard;
pub mod estimator;
pub mod mood;
pub mod regressor;
pub mod training;

pub use dashboard::DashboardService;
pub use estimator::{dashboard_estimator, service_estimator, ModelStoreError};
pub use mood::MoodClassifier;
pub use regressor::{BoostingParams, GradientBoostedRegressor};
pub use training::ModelTrainer;
