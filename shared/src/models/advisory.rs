//! Advisory rules: fertilizer, pest risk, and irrigation
//!
//! All three rules are total functions of the raw season inputs. They never
//! look at the yield estimate, so advisories stay available when the model
//! is missing or failing.

use serde::{Deserialize, Serialize};

use super::input::InputRecord;
use crate::types::Severity;

/// Below this rainfall the field needs irrigation (mm)
pub const IRRIGATION_RAINFALL_THRESHOLD_MM: f64 = 100.0;

/// A single fertilizer recommendation line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FertilizerAction {
    /// N < 50
    AddUrea,
    /// 50 <= N < 80
    TopUpAmmoniumSulphate,
    /// P < 20
    AddDap,
    /// 20 <= P < 40
    SupplementSsp,
    /// K < 20
    AddMop,
    /// 20 <= K < 40
    ApplyPotassiumNitrate,
    /// pH < 5.5
    ApplyLime,
    /// pH > 8.0
    ApplyGypsum,
    /// Nothing triggered
    NutrientsSufficient,
}

impl FertilizerAction {
    pub fn message(&self) -> &'static str {
        match self {
            FertilizerAction::AddUrea => "🔴 Add Urea (Nitrogen) – 100 kg/ha",
            FertilizerAction::TopUpAmmoniumSulphate => "🟠 Top-up with Ammonium Sulphate – 50 kg/ha",
            FertilizerAction::AddDap => "🔴 Add DAP (Phosphorus) – 60 kg/ha",
            FertilizerAction::SupplementSsp => "🟠 Supplement with SSP – 40 kg/ha",
            FertilizerAction::AddMop => "🔴 Add MOP (Potassium) – 50 kg/ha",
            FertilizerAction::ApplyPotassiumNitrate => "🟠 Apply Potassium Nitrate – 30 kg/ha",
            FertilizerAction::ApplyLime => "🔴 Apply Lime – 1 ton/ha",
            FertilizerAction::ApplyGypsum => "🟠 Apply Gypsum – 500 kg/ha",
            FertilizerAction::NutrientsSufficient => "🟢 Soil nutrients are sufficient ✅",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            FertilizerAction::AddUrea
            | FertilizerAction::AddDap
            | FertilizerAction::AddMop
            | FertilizerAction::ApplyLime => Severity::Critical,
            FertilizerAction::TopUpAmmoniumSulphate
            | FertilizerAction::SupplementSsp
            | FertilizerAction::ApplyPotassiumNitrate
            | FertilizerAction::ApplyGypsum => Severity::Warning,
            FertilizerAction::NutrientsSufficient => Severity::Ok,
        }
    }
}

impl std::fmt::Display for FertilizerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Pest risk band derived from canopy vigour and humidity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PestAlert {
    HighFungalRisk,
    ModerateAphidMiteRisk,
    LowLeafhopperRisk,
    Minimal,
}

impl PestAlert {
    pub fn message(&self) -> &'static str {
        match self {
            PestAlert::HighFungalRisk => "🔴 High fungal risk. Apply fungicide immediately.",
            PestAlert::ModerateAphidMiteRisk => {
                "🟠 Moderate aphid/mite risk. Monitor and apply neem-based spray."
            }
            PestAlert::LowLeafhopperRisk => "🟢 Low leafhopper risk. No action needed.",
            PestAlert::Minimal => "✅ Pest risk minimal. Continue regular monitoring.",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            PestAlert::HighFungalRisk => Severity::Critical,
            PestAlert::ModerateAphidMiteRisk => Severity::Warning,
            PestAlert::LowLeafhopperRisk | PestAlert::Minimal => Severity::Ok,
        }
    }
}

impl std::fmt::Display for PestAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationAdvice {
    Needed,
    NotRequired,
}

impl IrrigationAdvice {
    pub fn message(&self) -> &'static str {
        match self {
            IrrigationAdvice::Needed => "💧 Irrigation Needed",
            IrrigationAdvice::NotRequired => "✅ No Irrigation Required",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            IrrigationAdvice::Needed => Severity::Warning,
            IrrigationAdvice::NotRequired => Severity::Ok,
        }
    }
}

impl std::fmt::Display for IrrigationAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Fertilizer lines in N, P, K, pH order; at most one line per axis
///
/// The lower band of each axis wins. When no axis triggers, the result is
/// the single `NutrientsSufficient` sentinel, never an empty list.
pub fn fertilizer_recommendation(
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    soil_ph: f64,
) -> Vec<FertilizerAction> {
    let mut actions = Vec::new();

    if nitrogen < 50.0 {
        actions.push(FertilizerAction::AddUrea);
    } else if nitrogen < 80.0 {
        actions.push(FertilizerAction::TopUpAmmoniumSulphate);
    }

    if phosphorus < 20.0 {
        actions.push(FertilizerAction::AddDap);
    } else if phosphorus < 40.0 {
        actions.push(FertilizerAction::SupplementSsp);
    }

    if potassium < 20.0 {
        actions.push(FertilizerAction::AddMop);
    } else if potassium < 40.0 {
        actions.push(FertilizerAction::ApplyPotassiumNitrate);
    }

    if soil_ph < 5.5 {
        actions.push(FertilizerAction::ApplyLime);
    } else if soil_ph > 8.0 {
        actions.push(FertilizerAction::ApplyGypsum);
    }

    if actions.is_empty() {
        actions.push(FertilizerAction::NutrientsSufficient);
    }
    actions
}

/// First matching band wins
///
/// Low vigour with 40-60% humidity is not covered by any risk band and
/// falls through to `Minimal`.
pub fn pest_alert(ndvi: f64, humidity_pct: f64) -> PestAlert {
    if ndvi < 0.4 && humidity_pct > 70.0 {
        PestAlert::HighFungalRisk
    } else if ndvi < 0.6 && humidity_pct > 60.0 {
        PestAlert::ModerateAphidMiteRisk
    } else if ndvi < 0.6 && humidity_pct < 40.0 {
        PestAlert::LowLeafhopperRisk
    } else {
        PestAlert::Minimal
    }
}

pub fn irrigation_advice(rainfall_mm: f64) -> IrrigationAdvice {
    if rainfall_mm < IRRIGATION_RAINFALL_THRESHOLD_MM {
        IrrigationAdvice::Needed
    } else {
        IrrigationAdvice::NotRequired
    }
}

/// All three advisories for one season
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryResult {
    pub fertilizer: Vec<FertilizerAction>,
    pub pest_alert: PestAlert,
    pub irrigation: IrrigationAdvice,
}

impl AdvisoryResult {
    /// Evaluate every rule from the raw inputs
    pub fn evaluate(input: &InputRecord) -> Self {
        Self {
            fertilizer: fertilizer_recommendation(
                input.nitrogen,
                input.phosphorus,
                input.potassium,
                input.soil_ph,
            ),
            pest_alert: pest_alert(input.ndvi, input.humidity_pct),
            irrigation: irrigation_advice(input.rainfall_mm),
        }
    }

    /// Display lines for every advisory
    pub fn lines(&self) -> AdvisoryLines {
        AdvisoryLines {
            fertilizer: self
                .fertilizer
                .iter()
                .map(|a| AdvisoryLine::new(a.message(), a.severity()))
                .collect(),
            pest_alert: AdvisoryLine::new(
                self.pest_alert.message(),
                self.pest_alert.severity(),
            ),
            irrigation: AdvisoryLine::new(
                self.irrigation.message(),
                self.irrigation.severity(),
            ),
        }
    }
}

/// Rendered advisory text with its severity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvisoryLine {
    pub message: String,
    pub severity: Severity,
}

impl AdvisoryLine {
    fn new(message: &str, severity: Severity) -> Self {
        Self {
            message: message.to_string(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvisoryLines {
    pub fertilizer: Vec<AdvisoryLine>,
    pub pest_alert: AdvisoryLine,
    pub irrigation: AdvisoryLine,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn nitrogen_lines(actions: &[FertilizerAction]) -> Vec<FertilizerAction> {
        actions
            .iter()
            .copied()
            .filter(|a| {
                matches!(
                    a,
                    FertilizerAction::AddUrea | FertilizerAction::TopUpAmmoniumSulphate
                )
            })
            .collect()
    }

    #[test]
    fn test_all_sufficient_returns_sentinel_only() {
        let actions = fertilizer_recommendation(80.0, 40.0, 40.0, 6.5);
        assert_eq!(actions, vec![FertilizerAction::NutrientsSufficient]);
    }

    #[test]
    fn test_every_axis_triggered_in_order() {
        let actions = fertilizer_recommendation(10.0, 10.0, 10.0, 4.0);
        assert_eq!(
            actions,
            vec![
                FertilizerAction::AddUrea,
                FertilizerAction::AddDap,
                FertilizerAction::AddMop,
                FertilizerAction::ApplyLime,
            ]
        );
    }

    #[test]
    fn test_upper_bands() {
        let actions = fertilizer_recommendation(60.0, 30.0, 25.0, 8.5);
        assert_eq!(
            actions,
            vec![
                FertilizerAction::TopUpAmmoniumSulphate,
                FertilizerAction::SupplementSsp,
                FertilizerAction::ApplyPotassiumNitrate,
                FertilizerAction::ApplyGypsum,
            ]
        );
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(
            nitrogen_lines(&fertilizer_recommendation(50.0, 40.0, 40.0, 7.0)),
            vec![FertilizerAction::TopUpAmmoniumSulphate]
        );
        assert_eq!(
            fertilizer_recommendation(80.0, 20.0, 40.0, 7.0),
            vec![FertilizerAction::SupplementSsp]
        );
        // pH 5.5 and 8.0 are both inside the acceptable range
        assert_eq!(
            fertilizer_recommendation(80.0, 40.0, 40.0, 5.5),
            vec![FertilizerAction::NutrientsSufficient]
        );
        assert_eq!(
            fertilizer_recommendation(80.0, 40.0, 40.0, 8.0),
            vec![FertilizerAction::NutrientsSufficient]
        );
    }

    #[test]
    fn test_dashboard_defaults_need_potassium() {
        let result = AdvisoryResult::evaluate(&InputRecord::default());
        assert_eq!(
            result.fertilizer,
            vec![FertilizerAction::ApplyPotassiumNitrate]
        );
        assert_eq!(result.pest_alert, PestAlert::Minimal);
        assert_eq!(result.irrigation, IrrigationAdvice::NotRequired);
    }

    #[test]
    fn test_pest_alert_bands() {
        assert_eq!(pest_alert(0.3, 80.0), PestAlert::HighFungalRisk);
        assert_eq!(pest_alert(0.5, 65.0), PestAlert::ModerateAphidMiteRisk);
        assert_eq!(pest_alert(0.5, 30.0), PestAlert::LowLeafhopperRisk);
        assert_eq!(pest_alert(0.7, 50.0), PestAlert::Minimal);
    }

    #[test]
    fn test_pest_alert_uncovered_band_is_minimal() {
        assert_eq!(pest_alert(0.5, 40.0), PestAlert::Minimal);
        assert_eq!(pest_alert(0.5, 50.0), PestAlert::Minimal);
        assert_eq!(pest_alert(0.3, 60.0), PestAlert::Minimal);
    }

    #[test]
    fn test_pest_alert_low_ndvi_moderate_humidity() {
        // ndvi < 0.4 but humidity not above 70 drops to the moderate band
        assert_eq!(pest_alert(0.3, 65.0), PestAlert::ModerateAphidMiteRisk);
        assert_eq!(pest_alert(0.3, 70.0), PestAlert::ModerateAphidMiteRisk);
    }

    #[test]
    fn test_irrigation_boundary() {
        assert_eq!(irrigation_advice(99.0), IrrigationAdvice::Needed);
        assert_eq!(irrigation_advice(100.0), IrrigationAdvice::NotRequired);
        assert_eq!(irrigation_advice(0.0), IrrigationAdvice::Needed);
    }

    #[test]
    fn test_lines_carry_messages_and_severity() {
        let input = InputRecord {
            nitrogen: 30.0,
            rainfall_mm: 50.0,
            ..InputRecord::default()
        };
        let lines = AdvisoryResult::evaluate(&input).lines();
        assert_eq!(lines.fertilizer[0].message, "🔴 Add Urea (Nitrogen) – 100 kg/ha");
        assert_eq!(lines.fertilizer[0].severity, Severity::Critical);
        assert_eq!(lines.irrigation.message, "💧 Irrigation Needed");
        assert_eq!(lines.pest_alert.severity, Severity::Ok);
    }

    proptest! {
        #[test]
        fn prop_no_nitrogen_line_when_sufficient(
            n in 80.0f64..1000.0,
            p in 0.0f64..100.0,
            k in 0.0f64..100.0,
            ph in 3.5f64..9.0,
        ) {
            let actions = fertilizer_recommendation(n, p, k, ph);
            prop_assert!(nitrogen_lines(&actions).is_empty());
        }

        #[test]
        fn prop_nitrogen_bands_exclusive(
            n in 0.0f64..80.0,
            p in 0.0f64..100.0,
            k in 0.0f64..100.0,
            ph in 3.5f64..9.0,
        ) {
            let lines = nitrogen_lines(&fertilizer_recommendation(n, p, k, ph));
            let expected = if n < 50.0 {
                FertilizerAction::AddUrea
            } else {
                FertilizerAction::TopUpAmmoniumSulphate
            };
            prop_assert_eq!(lines, vec![expected]);
        }

        #[test]
        fn prop_sufficient_everywhere_yields_one_sentinel(
            n in 80.0f64..200.0,
            p in 40.0f64..100.0,
            k in 40.0f64..100.0,
            ph in 5.5f64..=8.0,
        ) {
            prop_assert_eq!(
                fertilizer_recommendation(n, p, k, ph),
                vec![FertilizerAction::NutrientsSufficient]
            );
        }

        #[test]
        fn prop_fertilizer_never_empty_and_at_most_four(
            n in 0.0f64..200.0,
            p in 0.0f64..100.0,
            k in 0.0f64..100.0,
            ph in 3.5f64..9.0,
        ) {
            let actions = fertilizer_recommendation(n, p, k, ph);
            prop_assert!(!actions.is_empty());
            prop_assert!(actions.len() <= 4);
        }

        #[test]
        fn prop_irrigation_threshold(rainfall in 0.0f64..500.0) {
            let advice = irrigation_advice(rainfall);
            prop_assert_eq!(advice == IrrigationAdvice::Needed, rainfall < 100.0);
        }
    }
}
