//! Offline model training
//!
//! Reads the crop yield CSV, drops incomplete rows, splits train/test with a
//! fixed seed, fits the boosted regressor, reports RMSE and R² on the held
//! out rows, and writes the artifact.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use shared::FeatureSchema;
use thiserror::Error;

use crate::config::TrainingConfig;
use crate::services::estimator::{save_artifact, ModelStoreError};
use crate::services::regressor::{GradientBoostedRegressor, TrainingError};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset not found at {0}")]
    DatasetNotFound(PathBuf),

    #[error("Dataset is missing column '{0}'")]
    MissingColumn(String),

    #[error("Failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset has no complete rows")]
    NoUsableRows,
}

#[derive(Error, Debug)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error(transparent)]
    Store(#[from] ModelStoreError),

    #[error("Unknown feature schema '{0}'")]
    UnknownSchema(String),

    #[error("Test size must be between 0 and 1, got {0}")]
    InvalidTestSize(f64),
}

/// Feature rows and their targets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingData {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl TrainingData {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn push(&mut self, row: Vec<f64>, target: f64) {
        self.features.push(row);
        self.targets.push(target);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub columns: Vec<String>,
    pub total_rows: usize,
    pub dropped_rows: usize,
}

/// Read the schema columns and `target` from a CSV file
///
/// Rows with a blank or unparseable value in any of those columns are
/// dropped. `True`/`False` cells read as 1/0.
pub fn load_dataset(
    path: &Path,
    schema: &FeatureSchema,
    target: &str,
) -> Result<(TrainingData, DatasetSummary), DatasetError> {
    if !path.exists() {
        return Err(DatasetError::DatasetNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();

    let position = |name: &str| {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    };
    let feature_positions = schema
        .column_names()
        .into_iter()
        .map(position)
        .collect::<Result<Vec<_>, _>>()?;
    let target_position = position(target)?;

    let mut data = TrainingData::default();
    let mut total_rows = 0;
    for record in reader.records() {
        let record = record?;
        total_rows += 1;

        let cell = |i: usize| record.get(i).and_then(parse_cell);
        let row: Option<Vec<f64>> = feature_positions.iter().map(|&i| cell(i)).collect();
        if let (Some(row), Some(y)) = (row, cell(target_position)) {
            data.push(row, y);
        }
    }

    if data.is_empty() {
        return Err(DatasetError::NoUsableRows);
    }

    let summary = DatasetSummary {
        columns,
        total_rows,
        dropped_rows: total_rows - data.len(),
    };
    Ok((data, summary))
}

/// Numeric value of a CSV cell, `None` when missing
pub fn parse_cell(cell: &str) -> Option<f64> {
    match cell.trim() {
        "" => None,
        "True" | "true" | "TRUE" => Some(1.0),
        "False" | "false" | "FALSE" => Some(0.0),
        other => other.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Shuffle with `seed` and hold out `ceil(test_size * n)` rows
pub fn train_test_split(
    data: &TrainingData,
    test_size: f64,
    seed: u64,
) -> (TrainingData, TrainingData) {
    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

    let n_test = ((test_size * n as f64).ceil() as usize).min(n);
    let mut test = TrainingData::default();
    let mut train = TrainingData::default();
    for (rank, &i) in order.iter().enumerate() {
        let part = if rank < n_test { &mut test } else { &mut train };
        part.push(data.features[i].clone(), data.targets[i]);
    }
    (train, test)
}

/// Held-out regression metrics
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ModelMetrics {
    pub rmse: f64,
    pub r2: f64,
}

pub fn evaluate(actual: &[f64], predicted: &[f64]) -> ModelMetrics {
    let n = actual.len().max(1) as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();

    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    ModelMetrics {
        rmse: (ss_res / n).sqrt(),
        r2,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub schema: String,
    pub dataset: DatasetSummary,
    pub train_rows: usize,
    pub test_rows: usize,
    pub metrics: ModelMetrics,
    pub output_path: PathBuf,
}

/// Runs one training pass as configured
pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<TrainingReport, TrainError> {
        let schema = self
            .config
            .feature_schema()
            .ok_or_else(|| TrainError::UnknownSchema(self.config.schema.clone()))?;
        if !(self.config.test_size > 0.0 && self.config.test_size < 1.0) {
            return Err(TrainError::InvalidTestSize(self.config.test_size));
        }

        let dataset_path = Path::new(&self.config.dataset_path);
        let (data, summary) = load_dataset(dataset_path, &schema, &self.config.target)?;
        tracing::info!("Columns in dataset: {:?}", summary.columns);
        tracing::info!(
            "Dataset loaded. Rows: {} ({} dropped as incomplete)",
            summary.total_rows,
            summary.dropped_rows
        );

        let (train, test) = train_test_split(&data, self.config.test_size, self.config.seed);
        tracing::info!(
            "Data split into {} training and {} testing rows",
            train.len(),
            test.len()
        );

        let model = GradientBoostedRegressor::fit(
            schema.clone(),
            &train.features,
            &train.targets,
            self.config.boosting_params(),
        )?;
        tracing::info!(
            "Model training complete ({} boosting rounds)",
            model.params().n_estimators
        );

        let metrics = evaluate(&test.targets, &model.predict_rows(&test.features));
        tracing::info!("RMSE: {:.2}", metrics.rmse);
        tracing::info!("R² Score: {:.2}", metrics.r2);

        let output_path = PathBuf::from(&self.config.output_path);
        save_artifact(&output_path, &model)?;
        tracing::info!("Model saved to: {}", output_path.display());

        Ok(TrainingReport {
            schema: schema.id(),
            dataset: summary,
            train_rows: train.len(),
            test_rows: test.len(),
            metrics,
            output_path,
        })
    }
}
