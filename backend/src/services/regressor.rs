//! Gradient-boosted regression trees
//!
//! Fitting and inference run on the `gbdt` booster; the artifact stores it
//! alongside the feature schema and hyperparameters it was trained with.
//! `gbdt` indexes its node tables and feature rows directly, so a loaded
//! artifact has its trees checked before it can serve predictions.

use gbdt::config::Config as BoosterConfig;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{FeatureSchema, FeatureVector, YieldModel};
use thiserror::Error;

/// Current model artifact format
pub const ARTIFACT_VERSION: u32 = 2;

/// Regression model fitting errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainingError {
    #[error("Training set is empty")]
    EmptyDataset,

    #[error("Row {row} has {found} features, schema {schema} expects {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
        schema: String,
    },

    #[error("Feature and target counts differ: {features} rows, {targets} targets")]
    LengthMismatch { features: usize, targets: usize },

    #[error("Non-finite value at row {row}")]
    NonFinite { row: usize },

    #[error("Invalid training parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Model artifact (de)serialisation errors
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Invalid model artifact: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Unsupported artifact version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Malformed tree {tree} in model artifact: {reason}")]
    MalformedTree { tree: usize, reason: String },
}

/// Boosting hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: u32,
    /// Minimum number of rows in a leaf
    pub min_leaf_size: usize,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 6,
            min_leaf_size: 1,
        }
    }
}

impl BoostingParams {
    fn validate(&self) -> Result<(), TrainingError> {
        if self.n_estimators == 0 {
            return Err(TrainingError::InvalidParameter("n_estimators must be positive"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(TrainingError::InvalidParameter("learning_rate must be positive"));
        }
        if self.max_depth == 0 {
            return Err(TrainingError::InvalidParameter("max_depth must be positive"));
        }
        if self.min_leaf_size == 0 {
            return Err(TrainingError::InvalidParameter("min_leaf_size must be positive"));
        }
        Ok(())
    }

    fn booster_config(&self, feature_size: usize) -> BoosterConfig {
        let mut config = BoosterConfig::new();
        config.set_feature_size(feature_size);
        config.set_max_depth(self.max_depth);
        config.set_iterations(self.n_estimators);
        config.set_shrinkage(self.learning_rate as ValueType);
        config.set_min_leaf_size(self.min_leaf_size);
        config.set_loss("SquaredError");
        // Full row and column sampling keeps fits reproducible
        config.set_data_sample_ratio(1.0);
        config.set_feature_sample_ratio(1.0);
        config
    }
}

/// Fitted ensemble, serialisable as the model artifact
#[derive(Serialize, Deserialize)]
pub struct GradientBoostedRegressor {
    version: u32,
    schema: FeatureSchema,
    params: BoostingParams,
    booster: GBDT,
}

impl GradientBoostedRegressor {
    /// Fit on row-major `features` against `targets`
    pub fn fit(
        schema: FeatureSchema,
        features: &[Vec<f64>],
        targets: &[f64],
        params: BoostingParams,
    ) -> Result<Self, TrainingError> {
        params.validate()?;
        check_training_set(&schema, features, targets)?;

        let mut training: DataVec = features
            .iter()
            .zip(targets)
            .map(|(row, &y)| Data::new_training_data(to_values(row), 1.0, y as ValueType, None))
            .collect();

        let mut booster = GBDT::new(&params.booster_config(schema.len()));
        booster.fit(&mut training);

        Ok(Self {
            version: ARTIFACT_VERSION,
            schema,
            params,
            booster,
        })
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }

    /// Predict a raw row in schema order
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.predict_rows(&[row.to_vec()])
            .first()
            .copied()
            .unwrap_or(f64::NAN)
    }

    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        if rows.is_empty() {
            return Vec::new();
        }
        let samples: DataVec = rows
            .iter()
            .map(|row| Data::new_test_data(to_values(row), None))
            .collect();
        self.booster
            .predict(&samples)
            .into_iter()
            .map(f64::from)
            .collect()
    }

    pub fn to_json(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an artifact, rejecting unknown versions and malformed trees
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let raw: Value = serde_json::from_str(json)?;

        let version = raw.get("version").and_then(Value::as_u64).unwrap_or(0) as u32;
        if version != ARTIFACT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: version,
                expected: ARTIFACT_VERSION,
            });
        }

        let schema: FeatureSchema =
            serde_json::from_value(raw.get("schema").cloned().unwrap_or(Value::Null))?;
        check_booster(raw.get("booster").unwrap_or(&Value::Null), schema.len())?;

        Ok(serde_json::from_value(raw)?)
    }
}

impl std::fmt::Debug for GradientBoostedRegressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientBoostedRegressor")
            .field("version", &self.version)
            .field("schema", &self.schema.id())
            .field("params", &self.params)
            .finish()
    }
}

impl YieldModel for GradientBoostedRegressor {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn kind(&self) -> &'static str {
        "gradient_boosted_trees"
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, String> {
        let row = features.values();
        if row.len() != self.schema.len() {
            return Err(format!(
                "expected {} features, got {}",
                self.schema.len(),
                row.len()
            ));
        }
        if let Some(column) = row
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| &self.schema.columns[i].name)
        {
            return Err(format!("feature '{}' is not a finite number", column));
        }
        Ok(self.predict_row(row))
    }
}

fn to_values(row: &[f64]) -> Vec<ValueType> {
    row.iter().map(|&v| v as ValueType).collect()
}

fn check_training_set(
    schema: &FeatureSchema,
    features: &[Vec<f64>],
    targets: &[f64],
) -> Result<(), TrainingError> {
    if features.len() != targets.len() {
        return Err(TrainingError::LengthMismatch {
            features: features.len(),
            targets: targets.len(),
        });
    }
    if targets.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    for (row, (values, target)) in features.iter().zip(targets).enumerate() {
        if values.len() != schema.len() {
            return Err(TrainingError::RaggedRow {
                row,
                found: values.len(),
                expected: schema.len(),
                schema: schema.id(),
            });
        }
        if !target.is_finite() || values.iter().any(|v| !v.is_finite()) {
            return Err(TrainingError::NonFinite { row });
        }
    }
    Ok(())
}

/// Check every serialised tree of a booster against `n_features`
///
/// Each tree is a node table rooted at index 0. A split node needs both
/// children, stored after it and inside the table, and a feature index
/// within the schema. Child index 0 marks a missing child.
fn check_booster(booster: &Value, n_features: usize) -> Result<(), ArtifactError> {
    let trees = booster
        .get("trees")
        .and_then(Value::as_array)
        .filter(|trees| !trees.is_empty())
        .ok_or_else(|| malformed(0, "booster has no trees"))?;

    for (tree, value) in trees.iter().enumerate() {
        let nodes = value
            .get("tree")
            .and_then(|t| t.get("tree"))
            .and_then(Value::as_array)
            .ok_or_else(|| malformed(tree, "missing node table"))?;
        check_nodes(tree, nodes, n_features)?;
    }
    Ok(())
}

fn check_nodes(tree: usize, nodes: &[Value], n_features: usize) -> Result<(), ArtifactError> {
    if nodes.is_empty() {
        return Err(malformed(tree, "tree has no nodes"));
    }

    for (position, node) in nodes.iter().enumerate() {
        let field = |name: &str| node.get("value").and_then(|v| v.get(name));
        let index = |name: &str| node.get(name).and_then(Value::as_u64).map(|i| i as usize);

        let pred = field("pred").and_then(Value::as_f64);
        if !pred.is_some_and(f64::is_finite) {
            return Err(malformed(tree, format!("node {} has no finite prediction", position)));
        }
        if field("is_leaf").and_then(Value::as_bool).unwrap_or(false) {
            continue;
        }

        match field("feature_index").and_then(Value::as_u64) {
            Some(feature) if (feature as usize) < n_features => {}
            found => {
                return Err(malformed(
                    tree,
                    format!(
                        "node {} splits on feature {:?}, schema has {}",
                        position, found, n_features
                    ),
                ))
            }
        }
        if !field("feature_value")
            .and_then(Value::as_f64)
            .is_some_and(f64::is_finite)
        {
            return Err(malformed(tree, format!("node {} has no finite threshold", position)));
        }
        for side in ["left", "right"] {
            match index(side) {
                Some(child) if child > position && child < nodes.len() => {}
                found => {
                    return Err(malformed(
                        tree,
                        format!("node {} has {} child {:?}", position, side, found),
                    ))
                }
            }
        }
    }
    Ok(())
}

fn malformed(tree: usize, reason: impl Into<String>) -> ArtifactError {
    ArtifactError::MalformedTree {
        tree,
        reason: reason.into(),
    }
}
