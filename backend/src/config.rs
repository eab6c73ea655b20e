//! Configuration management for the Crop Advisory Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with CROP_ prefix

use ::config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::FeatureSchema;

use crate::services::regressor::BoostingParams;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Model artifact configuration
    pub model: ModelConfig,

    /// Offline training configuration
    pub training: TrainingConfig,

    /// Season history configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Emotion classifier configuration
    #[serde(default)]
    pub sentiment: SentimentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

/// Which predictor backs the dashboard
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    /// Load a trained artifact; missing artifact means no model
    Trained,
    /// Use the hand-written soil formula
    Demo,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub estimator: EstimatorKind,

    /// Artifact for the dashboard (crop_yield_v1)
    pub dashboard_path: String,

    /// Artifact for the prediction endpoint (field_service_v1)
    pub service_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrainingConfig {
    /// CSV dataset path
    pub dataset_path: String,

    /// Where the fitted artifact is written
    pub output_path: String,

    /// Feature schema id, e.g. crop_yield_v1
    pub schema: String,

    /// Target column name
    pub target: String,

    pub test_size: f64,
    pub seed: u64,
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: u32,
    pub min_leaf_size: usize,
}

impl TrainingConfig {
    pub fn boosting_params(&self) -> BoostingParams {
        BoostingParams {
            n_estimators: self.n_estimators,
            learning_rate: self.learning_rate,
            max_depth: self.max_depth,
            min_leaf_size: self.min_leaf_size,
        }
    }

    pub fn feature_schema(&self) -> Option<FeatureSchema> {
        FeatureSchema::by_id(&self.schema)
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let params = BoostingParams::default();
        Self {
            dataset_path: "data/crop_yield.csv".to_string(),
            output_path: "model/crop_yield_model.json".to_string(),
            schema: FeatureSchema::crop_yield_v1().id(),
            target: "Yield_tons_per_hectare".to_string(),
            test_size: 0.2,
            seed: 42,
            n_estimators: params.n_estimators,
            learning_rate: params.learning_rate,
            max_depth: params.max_depth,
            min_leaf_size: params.min_leaf_size,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HistoryConfig {
    /// Year the current season is filed under; defaults to this year
    pub current_year: Option<i32>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SentimentConfig {
    /// Remote classifier endpoint; the keyword classifier is used when unset
    pub endpoint: Option<String>,

    /// API key sent as x-api-key
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CROP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let training = TrainingConfig::default();

        let config = ::config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("model.estimator", "trained")?
            .set_default("model.dashboard_path", "model/crop_yield_model.json")?
            .set_default("model.service_path", "crop_yield_model.json")?
            .set_default("training.dataset_path", training.dataset_path)?
            .set_default("training.output_path", training.output_path)?
            .set_default("training.schema", training.schema)?
            .set_default("training.target", training.target)?
            .set_default("training.test_size", training.test_size)?
            .set_default("training.seed", training.seed)?
            .set_default("training.n_estimators", training.n_estimators as u64)?
            .set_default("training.learning_rate", training.learning_rate)?
            .set_default("training.max_depth", training.max_depth as u64)?
            .set_default("training.min_leaf_size", training.min_leaf_size as u64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROP_ prefix)
            .add_source(
                Environment::with_prefix("CROP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Year the current season is filed under
    pub fn current_year(&self) -> i32 {
        use chrono::Datelike;

        self.history
            .current_year
            .unwrap_or_else(|| chrono::Utc::now().year())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorKind::Trained,
            dashboard_path: "model/crop_yield_model.json".to_string(),
            service_path: "crop_yield_model.json".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            training: TrainingConfig::default(),
            history: HistoryConfig::default(),
            sentiment: SentimentConfig::default(),
        }
    }
}
