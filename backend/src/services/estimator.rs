//! Model artifact loading
//!
//! Artifacts are read once at startup. A missing or unreadable artifact is
//! not fatal: the estimator starts without a model and every prediction
//! reports `ModelUnavailable`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::{FeatureSchema, YieldEstimator};
use thiserror::Error;

use crate::config::{EstimatorKind, ModelConfig};
use crate::services::regressor::{ArtifactError, GradientBoostedRegressor};

#[derive(Error, Debug)]
pub enum ModelStoreError {
    #[error("Model artifact not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Model artifact was trained on {found}, expected {expected}")]
    SchemaMismatch { expected: String, found: String },
}

/// Read a fitted model and check it was trained on `expected`
pub fn load_artifact(
    path: &Path,
    expected: &FeatureSchema,
) -> Result<GradientBoostedRegressor, ModelStoreError> {
    if !path.exists() {
        return Err(ModelStoreError::NotFound(path.to_path_buf()));
    }

    let json = std::fs::read_to_string(path)?;
    let model = GradientBoostedRegressor::from_json(&json)?;

    let found = shared::YieldModel::schema(&model);
    if found != expected {
        return Err(ModelStoreError::SchemaMismatch {
            expected: expected.id(),
            found: found.id(),
        });
    }
    Ok(model)
}

/// Write a fitted model, creating parent directories as needed
pub fn save_artifact(path: &Path, model: &GradientBoostedRegressor) -> Result<(), ModelStoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, model.to_json()?)?;
    Ok(())
}

/// Estimator over a trained artifact, or an unavailable one when loading fails
pub fn load_estimator(path: &Path, schema: FeatureSchema) -> YieldEstimator {
    match load_artifact(path, &schema) {
        Ok(model) => {
            tracing::info!(
                "Loaded {} model from {} ({} boosting rounds)",
                schema.id(),
                path.display(),
                model.params().n_estimators
            );
            YieldEstimator::new(Arc::new(model))
        }
        Err(e) => {
            tracing::warn!("Model not loaded: {}", e);
            YieldEstimator::unavailable(schema)
        }
    }
}

/// Estimator backing the dashboard pipeline
pub fn dashboard_estimator(config: &ModelConfig) -> YieldEstimator {
    match config.estimator {
        EstimatorKind::Demo => {
            tracing::info!("Dashboard using demo soil formula");
            YieldEstimator::demo()
        }
        EstimatorKind::Trained => load_estimator(
            Path::new(&config.dashboard_path),
            FeatureSchema::crop_yield_v1(),
        ),
    }
}

/// Estimator backing the prediction endpoint
pub fn service_estimator(config: &ModelConfig) -> YieldEstimator {
    load_estimator(
        Path::new(&config.service_path),
        FeatureSchema::field_service_v1(),
    )
}
