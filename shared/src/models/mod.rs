//! Domain models for the Crop Advisory Platform

mod advisory;
mod feature;
mod input;
mod mood;
mod season;

pub use advisory::*;
pub use feature::*;
pub use input::*;
pub use mood::*;
pub use season::*;
