//! Shared types and decision logic for the Crop Advisory Platform
//!
//! This crate contains the pure, I/O-free core shared between the backend,
//! the browser dashboard (via WASM), and the offline model trainer.

pub mod error;
pub mod estimator;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use estimator::*;
pub use models::*;
pub use types::*;
pub use validation::*;
