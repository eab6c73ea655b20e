//! Offline trainer for the crop yield model
//!
//! Reads `training.*` from the same configuration as the server, e.g.
//! `CROP__TRAINING__DATASET_PATH=data/crop_yield.csv`.

use crop_advisory_backend::{services::ModelTrainer, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_advisory_backend=info,train_model=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Training {} model", config.training.schema);
    let report = ModelTrainer::new(config.training).run()?;
    tracing::info!(
        "Done: {} train / {} test rows, RMSE {:.2}, R² {:.2}",
        report.train_rows,
        report.test_rows,
        report.metrics.rmse,
        report.metrics.r2
    );

    Ok(())
}
