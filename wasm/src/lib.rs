//! WebAssembly module for the Crop Advisory Platform
//!
//! Provides client-side computation for:
//! - Fertilizer, pest and irrigation advisories
//! - The demo soil yield formula
//! - Input validation before a dashboard request is sent

use shared::{
    fertilizer_recommendation, irrigation_advice, pest_alert, round_to, validate_input_record,
    AdvisoryResult, DemoSoilModel, InputRecord,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn parse_input(input_json: &str) -> Result<InputRecord, JsValue> {
    serde_json::from_str(input_json).map_err(|e| {
        let message = format!("Invalid input JSON: {}", e);
        web_sys::console::warn_1(&JsValue::from_str(&message));
        JsValue::from_str(&message)
    })
}

/// Fertilizer advice lines as a JSON array of `{message, severity}`
#[wasm_bindgen]
pub fn fertilizer_advice(nitrogen: f64, phosphorus: f64, potassium: f64, soil_ph: f64) -> String {
    let lines: Vec<_> = fertilizer_recommendation(nitrogen, phosphorus, potassium, soil_ph)
        .iter()
        .map(|action| {
            serde_json::json!({
                "message": action.message(),
                "severity": action.severity(),
            })
        })
        .collect();
    to_json(&lines)
}

/// Pest alert text for the canopy and humidity readings
#[wasm_bindgen]
pub fn pest_alert_message(ndvi: f64, humidity_pct: f64) -> String {
    pest_alert(ndvi, humidity_pct).message().to_string()
}

/// Irrigation advice text for the season's rainfall
#[wasm_bindgen]
pub fn irrigation_message(rainfall_mm: f64) -> String {
    irrigation_advice(rainfall_mm).message().to_string()
}

/// Demo soil formula estimate in tons/ha, rounded to 2 decimals
#[wasm_bindgen]
pub fn demo_yield_estimate(
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    rainfall: f64,
    soil_ph: f64,
    ndvi: f64,
) -> f64 {
    round_to(
        DemoSoilModel::formula(nitrogen, phosphorus, potassium, rainfall, soil_ph, ndvi),
        2,
    )
}

/// All advisories for a season input (JSON, missing fields defaulted)
#[wasm_bindgen]
pub fn evaluate_advisories(input_json: &str) -> Result<String, JsValue> {
    let input = parse_input(input_json)?;
    let advisories = AdvisoryResult::evaluate(&input);
    Ok(to_json(&serde_json::json!({
        "advisories": advisories,
        "lines": advisories.lines(),
    })))
}

/// Validate a season input; rejects with `{field, message}` on the first bad field
#[wasm_bindgen]
pub fn validate_season_input(input_json: &str) -> Result<(), JsValue> {
    let input = parse_input(input_json)?;
    validate_input_record(&input).map_err(|(field, message)| {
        JsValue::from_str(&to_json(&serde_json::json!({
            "field": field,
            "message": message,
        })))
    })
}
