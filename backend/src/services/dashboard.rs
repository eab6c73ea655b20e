//! Dashboard pipeline
//!
//! Every call rebuilds the whole view from the submitted inputs: feature
//! vector, yield estimate, advisories, charts and season history. Nothing is
//! cached between calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::{
    linspace, round_to, validate_input_record, AdvisoryLines, AdvisoryResult, CropType,
    InputRecord, SeasonHistory, SeasonRecord, YieldBar, YieldEstimate, YieldEstimator,
};

use crate::error::{AppError, AppResult};

/// Rainfall sweep for the yield curve (mm)
pub const SWEEP_RAINFALL_MIN: f64 = 0.0;
pub const SWEEP_RAINFALL_MAX: f64 = 500.0;
pub const SWEEP_POINTS: usize = 20;

/// Recommended application rates (kg/ha)
pub const RECOMMENDED_NUTRIENTS: [(&str, f64); 3] =
    [("Nitrogen", 100.0), ("Phosphorus", 50.0), ("Potassium", 50.0)];

fn default_farmer_name() -> String {
    "Tamlin".to_string()
}

/// Dashboard request: who is asking and the season inputs
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardRequest {
    #[serde(default = "default_farmer_name")]
    pub farmer_name: String,
    #[serde(default)]
    pub crop_type: CropType,
    #[serde(default)]
    pub input: InputRecord,
}

impl Default for DashboardRequest {
    fn default() -> Self {
        Self {
            farmer_name: default_farmer_name(),
            crop_type: CropType::default(),
            input: InputRecord::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CurvePoint {
    pub rainfall: f64,
    #[serde(rename = "yield")]
    pub yield_tons_per_ha: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NutrientBar {
    pub nutrient: String,
    pub current: f64,
    pub recommended: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub yield_vs_rainfall: Vec<CurvePoint>,
    pub nutrients: Vec<NutrientBar>,
    pub yield_history: Vec<YieldBar>,
}

/// Everything the dashboard renders for one set of inputs
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub farmer_name: String,
    pub crop_type: CropType,
    pub current_year: i32,
    pub estimate: YieldEstimate,
    /// Estimate rounded for display
    pub predicted_yield: f64,
    pub advisories: AdvisoryResult,
    pub advisory_lines: AdvisoryLines,
    pub charts: DashboardCharts,
    pub seasons: BTreeMap<i32, SeasonRecord>,
}

/// Runs the dashboard pipeline over a read-only estimator and history
#[derive(Clone)]
pub struct DashboardService {
    estimator: Arc<YieldEstimator>,
    history: Arc<SeasonHistory>,
    current_year: i32,
}

impl DashboardService {
    pub fn new(
        estimator: Arc<YieldEstimator>,
        history: Arc<SeasonHistory>,
        current_year: i32,
    ) -> Self {
        Self {
            estimator,
            history,
            current_year,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Yield estimate for the inputs, with the failure message if any
    pub fn estimate(&self, input: &InputRecord) -> AppResult<YieldEstimate> {
        validate(input)?;
        let estimate = self.estimator.estimate_from(input)?;
        if let Some(message) = estimate.message() {
            tracing::warn!(
                "Dashboard estimate fell back to {}: {}",
                estimate.value,
                message
            );
        }
        Ok(estimate)
    }

    /// Full dashboard for one request
    pub fn evaluate(&self, request: &DashboardRequest) -> AppResult<DashboardReport> {
        let input = &request.input;
        let estimate = self.estimate(input)?;

        let advisories = AdvisoryResult::evaluate(input);
        let advisory_lines = advisories.lines();

        let charts = DashboardCharts {
            yield_vs_rainfall: self.yield_curve(input)?,
            nutrients: nutrient_comparison(input),
            yield_history: self.history.yield_chart(self.current_year, estimate.value),
        };
        let seasons = self
            .history
            .with_current(self.current_year, input, estimate.value);

        tracing::debug!(
            "Dashboard for {} ({}): {:.2} t/ha, {} fertilizer actions",
            request.farmer_name,
            request.crop_type,
            estimate.value,
            advisories.fertilizer.len()
        );

        Ok(DashboardReport {
            farmer_name: request.farmer_name.clone(),
            crop_type: request.crop_type,
            current_year: self.current_year,
            predicted_yield: round_to(estimate.value, 2),
            estimate,
            advisories,
            advisory_lines,
            charts,
            seasons,
        })
    }

    /// Advisories only
    pub fn advisories(&self, input: &InputRecord) -> AppResult<(AdvisoryResult, AdvisoryLines)> {
        validate(input)?;
        let advisories = AdvisoryResult::evaluate(input);
        let lines = advisories.lines();
        Ok((advisories, lines))
    }

    /// Year-ordered seasons including the current one
    pub fn seasons(&self, input: &InputRecord) -> AppResult<BTreeMap<i32, SeasonRecord>> {
        let estimate = self.estimate(input)?;
        Ok(self
            .history
            .with_current(self.current_year, input, estimate.value))
    }

    /// Detail for one season year
    pub fn season(&self, year: i32, input: &InputRecord) -> AppResult<SeasonRecord> {
        let estimate = self.estimate(input)?;
        self.history
            .season(year, self.current_year, input, estimate.value)
            .ok_or_else(|| AppError::NotFound(format!("Season {}", year)))
    }

    /// Predicted yield over the rainfall sweep, other inputs held
    ///
    /// Points the estimator cannot produce are plotted at `DEFAULT_YIELD`.
    pub fn yield_curve(&self, input: &InputRecord) -> AppResult<Vec<CurvePoint>> {
        linspace(SWEEP_RAINFALL_MIN, SWEEP_RAINFALL_MAX, SWEEP_POINTS)
            .into_iter()
            .map(|rainfall| {
                let estimate = self.estimator.estimate_from(&input.with_rainfall(rainfall))?;
                Ok(CurvePoint {
                    rainfall,
                    yield_tons_per_ha: estimate.value,
                })
            })
            .collect()
    }
}

/// Current N/P/K against the recommended rates
pub fn nutrient_comparison(input: &InputRecord) -> Vec<NutrientBar> {
    let current = [input.nitrogen, input.phosphorus, input.potassium];
    RECOMMENDED_NUTRIENTS
        .iter()
        .zip(current)
        .map(|(&(nutrient, recommended), current)| NutrientBar {
            nutrient: nutrient.to_string(),
            current,
            recommended,
        })
        .collect()
}

fn validate(input: &InputRecord) -> AppResult<()> {
    validate_input_record(input).map_err(|(field, message)| AppError::validation(field, message))
}
