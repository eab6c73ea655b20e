//! HTTP handlers for the Crop Advisory Platform

pub mod dashboard;
pub mod health;
pub mod mood;
pub mod predict;

pub use dashboard::*;
pub use health::*;
pub use mood::*;
pub use predict::*;
