//! Validation utilities for the Crop Advisory Platform
//!
//! Only physically impossible inputs are rejected. The dashboard ranges
//! (e.g. 60-180 days to harvest, pH 3.5-9.0) are conventions and are not
//! enforced here.

use crate::models::InputRecord;

// ============================================================================
// Season Input Validations
// ============================================================================

/// Validate rainfall is a non-negative amount
pub fn validate_rainfall(rainfall_mm: f64) -> Result<(), &'static str> {
    if !rainfall_mm.is_finite() {
        return Err("Rainfall must be a finite number");
    }
    if rainfall_mm < 0.0 {
        return Err("Rainfall cannot be negative");
    }
    Ok(())
}

/// Validate NDVI is within 0.0-1.0
pub fn validate_ndvi(ndvi: f64) -> Result<(), &'static str> {
    if !(0.0..=1.0).contains(&ndvi) {
        return Err("NDVI must be between 0.0 and 1.0");
    }
    Ok(())
}

/// Validate relative humidity is a percentage
pub fn validate_humidity(humidity_pct: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&humidity_pct) {
        return Err("Humidity must be between 0 and 100%");
    }
    Ok(())
}

/// Validate soil pH is on the 0-14 scale
pub fn validate_soil_ph(soil_ph: f64) -> Result<(), &'static str> {
    if !(0.0..=14.0).contains(&soil_ph) {
        return Err("Soil pH must be between 0 and 14");
    }
    Ok(())
}

/// Validate a nutrient application rate (kg/ha)
pub fn validate_nutrient(amount: f64) -> Result<(), &'static str> {
    if !amount.is_finite() || amount < 0.0 {
        return Err("Nutrient levels must be non-negative numbers");
    }
    Ok(())
}

/// Validate temperature is a finite reading
pub fn validate_temperature(temperature_c: f64) -> Result<(), &'static str> {
    if !temperature_c.is_finite() {
        return Err("Temperature must be a finite number");
    }
    Ok(())
}

/// Validate a whole season record, reporting the first offending field
pub fn validate_input_record(input: &InputRecord) -> Result<(), (&'static str, &'static str)> {
    validate_rainfall(input.rainfall_mm).map_err(|e| ("rainfall_mm", e))?;
    validate_temperature(input.temperature_c).map_err(|e| ("temperature_c", e))?;
    validate_nutrient(input.nitrogen).map_err(|e| ("nitrogen", e))?;
    validate_nutrient(input.phosphorus).map_err(|e| ("phosphorus", e))?;
    validate_nutrient(input.potassium).map_err(|e| ("potassium", e))?;
    validate_soil_ph(input.soil_ph).map_err(|e| ("soil_ph", e))?;
    validate_humidity(input.humidity_pct).map_err(|e| ("humidity_pct", e))?;
    validate_ndvi(input.ndvi).map_err(|e| ("ndvi", e))?;
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate free text is not blank
pub fn validate_free_text(text: &str) -> Result<(), &'static str> {
    if text.trim().is_empty() {
        return Err("Text cannot be empty");
    }
    if text.chars().count() > 1000 {
        return Err("Text must be at most 1000 characters");
    }
    Ok(())
}
