//! Error types for feature construction and estimation

use thiserror::Error;

/// Feature vector construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// The input does not carry a field the schema requires
    #[error("Schema mismatch: {schema} requires field '{field}'")]
    SchemaMismatch { schema: String, field: String },
}

/// Yield estimation errors
///
/// Both variants are recoverable: callers substitute a default estimate and
/// surface the message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
}
