//! Season input record

use serde::{Deserialize, Deserializer, Serialize};

use super::feature::{FeatureKey, FeatureSource};

/// Measured or entered conditions for the current season
///
/// Recreated for every evaluation and never persisted. Missing fields take
/// the dashboard defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRecord {
    pub rainfall_mm: f64,
    pub temperature_c: f64,
    #[serde(deserialize_with = "flag")]
    pub fertilizer_used: bool,
    #[serde(deserialize_with = "flag")]
    pub irrigation_used: bool,
    /// 60-180 by convention
    pub days_to_harvest: u32,
    /// kg/ha
    pub nitrogen: f64,
    /// kg/ha
    pub phosphorus: f64,
    /// kg/ha
    pub potassium: f64,
    /// 3.5-9.0 by convention
    pub soil_ph: f64,
    /// 10-100 by convention
    pub humidity_pct: f64,
    /// 0.0 (poor) to 1.0 (excellent)
    pub ndvi: f64,
}

impl Default for InputRecord {
    fn default() -> Self {
        Self {
            rainfall_mm: 150.0,
            temperature_c: 25.0,
            fertilizer_used: false,
            irrigation_used: false,
            days_to_harvest: 120,
            nitrogen: 80.0,
            phosphorus: 40.0,
            potassium: 30.0,
            soil_ph: 6.5,
            humidity_pct: 60.0,
            ndvi: 0.6,
        }
    }
}

impl InputRecord {
    /// Copy of this record with a different rainfall, used by the yield sweep
    pub fn with_rainfall(&self, rainfall_mm: f64) -> Self {
        Self {
            rainfall_mm,
            ..self.clone()
        }
    }
}

impl FeatureSource for InputRecord {
    fn feature(&self, key: FeatureKey) -> Option<f64> {
        let value = match key {
            FeatureKey::Rainfall => self.rainfall_mm,
            FeatureKey::Temperature => self.temperature_c,
            FeatureKey::FertilizerUsed => encode_flag(self.fertilizer_used),
            FeatureKey::IrrigationUsed => encode_flag(self.irrigation_used),
            FeatureKey::DaysToHarvest => f64::from(self.days_to_harvest),
            FeatureKey::Nitrogen => self.nitrogen,
            FeatureKey::Phosphorus => self.phosphorus,
            FeatureKey::Potassium => self.potassium,
            FeatureKey::SoilPh => self.soil_ph,
            FeatureKey::Humidity => self.humidity_pct,
            FeatureKey::Ndvi => self.ndvi,
            FeatureKey::Pesticide => return None,
        };
        Some(value)
    }
}

fn encode_flag(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Accept `true`/`false` as well as the 0/1 encoding used by the dataset
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "expected 0 or 1, got {}",
            other
        ))),
    }
}
