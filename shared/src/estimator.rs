//! Yield estimation contract
//!
//! `YieldEstimator` hides whether a trained model, the demo formula, or
//! nothing at all backs the prediction. Callers always receive a number:
//! when no model is loaded or inference fails the estimate falls back to
//! [`DEFAULT_YIELD`] and carries the error for display.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{EstimateError, FeatureError};
use crate::models::{FeatureSchema, FeatureSource, FeatureVector};

/// Estimate substituted when prediction is impossible (tons/ha)
pub const DEFAULT_YIELD: f64 = 0.0;

/// A fitted or formula-based yield predictor
pub trait YieldModel: Send + Sync {
    /// Schema the model expects its input in
    fn schema(&self) -> &FeatureSchema;

    /// Short label for logs and health output
    fn kind(&self) -> &'static str;

    /// Predict from a vector already checked against `schema()`
    fn predict(&self, features: &FeatureVector) -> Result<f64, String>;
}

/// Hand-written linear formula used when no trained model is configured
#[derive(Debug, Clone)]
pub struct DemoSoilModel {
    schema: FeatureSchema,
}

impl DemoSoilModel {
    pub fn new() -> Self {
        Self {
            schema: FeatureSchema::soil_demo_v1(),
        }
    }

    /// 0.05N + 0.03P + 0.04K + rainfall/50 ± 0.5 (pH in 6.0-7.5) + 5·ndvi
    pub fn formula(
        nitrogen: f64,
        phosphorus: f64,
        potassium: f64,
        rainfall: f64,
        soil_ph: f64,
        ndvi: f64,
    ) -> f64 {
        let ph_term = if (6.0..=7.5).contains(&soil_ph) { 0.5 } else { -0.5 };
        0.05 * nitrogen + 0.03 * phosphorus + 0.04 * potassium + rainfall / 50.0 + ph_term
            + 5.0 * ndvi
    }
}

impl Default for DemoSoilModel {
    fn default() -> Self {
        Self::new()
    }
}

impl YieldModel for DemoSoilModel {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn kind(&self) -> &'static str {
        "demo_formula"
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, String> {
        match *features.values() {
            [n, p, k, rainfall, ph, ndvi] => Ok(Self::formula(n, p, k, rainfall, ph, ndvi)),
            _ => Err(format!(
                "demo formula expects 6 features, got {}",
                features.values().len()
            )),
        }
    }
}

/// Outcome of one estimation: always a value, plus the error if any
#[derive(Debug, Clone, PartialEq)]
pub struct YieldEstimate {
    pub value: f64,
    pub error: Option<EstimateError>,
}

impl YieldEstimate {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// User-facing message for a failed estimate
    pub fn message(&self) -> Option<String> {
        self.error.as_ref().map(|e| match e {
            EstimateError::ModelUnavailable => "Model not loaded.".to_string(),
            other => other.to_string(),
        })
    }
}

impl Serialize for YieldEstimate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let status = match &self.error {
            None => "ok",
            Some(EstimateError::ModelUnavailable) => "model_unavailable",
            Some(EstimateError::PredictionFailed(_)) => "prediction_failed",
        };
        let mut state = serializer.serialize_struct("YieldEstimate", 3)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("status", status)?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

/// Single `predict(features) -> yield` entry point over an optional model
#[derive(Clone)]
pub struct YieldEstimator {
    schema: FeatureSchema,
    model: Option<Arc<dyn YieldModel>>,
}

impl YieldEstimator {
    pub fn new(model: Arc<dyn YieldModel>) -> Self {
        Self {
            schema: model.schema().clone(),
            model: Some(model),
        }
    }

    /// Estimator backed by the demo formula
    pub fn demo() -> Self {
        Self::new(Arc::new(DemoSoilModel::new()))
    }

    /// Estimator with no model; every prediction reports `ModelUnavailable`
    pub fn unavailable(schema: FeatureSchema) -> Self {
        Self {
            schema,
            model: None,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Label of the backing model, `"unavailable"` when none
    pub fn kind(&self) -> &'static str {
        self.model.as_ref().map_or("unavailable", |m| m.kind())
    }

    /// Predict without substitution
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, EstimateError> {
        let model = self.model.as_ref().ok_or(EstimateError::ModelUnavailable)?;

        if features.schema() != &self.schema {
            return Err(EstimateError::PredictionFailed(format!(
                "feature schema mismatch: model expects {}, got {}",
                self.schema.id(),
                features.schema().id()
            )));
        }

        let value = model
            .predict(features)
            .map_err(EstimateError::PredictionFailed)?;
        if !value.is_finite() {
            return Err(EstimateError::PredictionFailed(format!(
                "model returned non-finite value {}",
                value
            )));
        }
        Ok(value)
    }

    /// Predict, substituting [`DEFAULT_YIELD`] on failure
    pub fn estimate(&self, features: &FeatureVector) -> YieldEstimate {
        match self.predict(features) {
            Ok(value) => YieldEstimate { value, error: None },
            Err(error) => YieldEstimate {
                value: DEFAULT_YIELD,
                error: Some(error),
            },
        }
    }

    /// Build a vector in this estimator's schema and estimate from it
    pub fn estimate_from<S: FeatureSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<YieldEstimate, FeatureError> {
        let features = self.schema.build(source)?;
        Ok(self.estimate(&features))
    }
}

impl std::fmt::Debug for YieldEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YieldEstimator")
            .field("schema", &self.schema.id())
            .field("kind", &self.kind())
            .finish()
    }
}
