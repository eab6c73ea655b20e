//! Season history models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::input::InputRecord;

/// Snapshot of one season's soil, weather and yield
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonRecord {
    pub year: i32,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub rainfall: f64,
    pub soil_ph: f64,
    pub ndvi: f64,
    /// tons/ha
    #[serde(rename = "yield")]
    pub yield_tons_per_ha: f64,
}

impl SeasonRecord {
    /// Current season from live inputs and the fresh estimate
    pub fn current(year: i32, input: &InputRecord, estimate: f64) -> Self {
        Self {
            year,
            nitrogen: input.nitrogen,
            phosphorus: input.phosphorus,
            potassium: input.potassium,
            rainfall: input.rainfall_mm,
            soil_ph: input.soil_ph,
            ndvi: input.ndvi,
            yield_tons_per_ha: estimate,
        }
    }
}

/// Recorded yield for one past year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearlyYield {
    pub year: i32,
    #[serde(rename = "yield")]
    pub yield_tons_per_ha: f64,
}

/// One bar of the yearly yield chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldBar {
    pub label: String,
    #[serde(rename = "yield")]
    pub yield_tons_per_ha: f64,
    pub predicted: bool,
}

/// Fixed historical seasons plus the synthesized current season
///
/// Historical data is injected at construction and never modified; the
/// current season is rebuilt on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonHistory {
    seasons: BTreeMap<i32, SeasonRecord>,
    yearly_yields: Vec<YearlyYield>,
}

impl SeasonHistory {
    pub fn new(seasons: Vec<SeasonRecord>, mut yearly_yields: Vec<YearlyYield>) -> Self {
        yearly_yields.sort_by_key(|y| y.year);
        Self {
            seasons: seasons.into_iter().map(|s| (s.year, s)).collect(),
            yearly_yields,
        }
    }

    /// Demo farm history shipped with the dashboard
    pub fn builtin() -> Self {
        let season = |year, nitrogen, phosphorus, potassium, rainfall, soil_ph, ndvi, yield_tons_per_ha| {
            SeasonRecord {
                year,
                nitrogen,
                phosphorus,
                potassium,
                rainfall,
                soil_ph,
                ndvi,
                yield_tons_per_ha,
            }
        };
        let yearly = |year, yield_tons_per_ha| YearlyYield {
            year,
            yield_tons_per_ha,
        };

        Self::new(
            vec![
                season(2019, 40.0, 25.0, 35.0, 950.0, 6.2, 0.65, 2.5),
                season(2022, 50.0, 30.0, 40.0, 1200.0, 6.8, 0.75, 3.2),
                season(2023, 45.0, 28.0, 38.0, 1100.0, 6.5, 0.78, 3.5),
            ],
            vec![
                yearly(2019, 2.5),
                yearly(2020, 3.0),
                yearly(2021, 3.2),
                yearly(2022, 2.8),
                yearly(2023, 3.5),
            ],
        )
    }

    pub fn historical(&self) -> &BTreeMap<i32, SeasonRecord> {
        &self.seasons
    }

    pub fn yearly_yields(&self) -> &[YearlyYield] {
        &self.yearly_yields
    }

    /// Year-ordered seasons with the current season under `current_year`
    pub fn with_current(
        &self,
        current_year: i32,
        input: &InputRecord,
        estimate: f64,
    ) -> BTreeMap<i32, SeasonRecord> {
        let mut seasons = self.seasons.clone();
        seasons.insert(
            current_year,
            SeasonRecord::current(current_year, input, estimate),
        );
        seasons
    }

    /// Detail for a single year, current season included
    pub fn season(
        &self,
        year: i32,
        current_year: i32,
        input: &InputRecord,
        estimate: f64,
    ) -> Option<SeasonRecord> {
        if year == current_year {
            Some(SeasonRecord::current(current_year, input, estimate))
        } else {
            self.seasons.get(&year).cloned()
        }
    }

    /// Past yields followed by the predicted current-year bar
    pub fn yield_chart(&self, current_year: i32, estimate: f64) -> Vec<YieldBar> {
        self.yearly_yields
            .iter()
            .map(|y| YieldBar {
                label: y.year.to_string(),
                yield_tons_per_ha: y.yield_tons_per_ha,
                predicted: false,
            })
            .chain(std::iter::once(YieldBar {
                label: format!("{} (Predicted)", current_year),
                yield_tons_per_ha: estimate,
                predicted: true,
            }))
            .collect()
    }
}

impl Default for SeasonHistory {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_history_years() {
        let history = SeasonHistory::builtin();
        let years: Vec<i32> = history.historical().keys().copied().collect();
        assert_eq!(years, vec![2019, 2022, 2023]);
        assert_eq!(history.historical()[&2022].yield_tons_per_ha, 3.2);
    }

    #[test]
    fn test_current_season_is_appended_in_order() {
        let history = SeasonHistory::builtin();
        let input = InputRecord {
            nitrogen: 90.0,
            ..InputRecord::default()
        };

        let seasons = history.with_current(2024, &input, 4.1);
        let years: Vec<i32> = seasons.keys().copied().collect();
        assert_eq!(years, vec![2019, 2022, 2023, 2024]);
        assert_eq!(seasons[&2024].nitrogen, 90.0);
        assert_eq!(seasons[&2024].rainfall, 150.0);
        assert_eq!(seasons[&2024].yield_tons_per_ha, 4.1);
    }

    #[test]
    fn test_historical_entries_survive_repeated_calls() {
        let history = SeasonHistory::builtin();
        let before = history.clone();

        let dry = InputRecord {
            rainfall_mm: 20.0,
            ..InputRecord::default()
        };
        let wet = InputRecord {
            rainfall_mm: 480.0,
            nitrogen: 10.0,
            ..InputRecord::default()
        };

        let first = history.with_current(2024, &dry, 1.0);
        let second = history.with_current(2024, &wet, 5.0);

        assert_eq!(history, before);
        for year in [2019, 2022, 2023] {
            assert_eq!(first[&year], second[&year]);
            assert_eq!(first[&year], before.historical()[&year]);
        }
        assert_ne!(first[&2024], second[&2024]);
    }

    #[test]
    fn test_season_detail_lookup() {
        let history = SeasonHistory::builtin();
        let input = InputRecord::default();

        assert_eq!(history.season(2023, 2024, &input, 2.0).unwrap().ndvi, 0.78);
        assert_eq!(history.season(2024, 2024, &input, 2.0).unwrap().yield_tons_per_ha, 2.0);
        assert!(history.season(2020, 2024, &input, 2.0).is_none());
    }

    #[test]
    fn test_yield_chart_ends_with_prediction() {
        let chart = SeasonHistory::builtin().yield_chart(2024, 3.75);
        assert_eq!(chart.len(), 6);
        assert_eq!(chart[0].label, "2019");
        assert_eq!(chart[3].yield_tons_per_ha, 2.8);
        assert_eq!(chart[5].label, "2024 (Predicted)");
        assert!(chart[5].predicted);
        assert_eq!(chart[5].yield_tons_per_ha, 3.75);
    }

    #[test]
    fn test_season_record_serializes_yield_key() {
        let json = serde_json::to_value(SeasonRecord::current(2024, &InputRecord::default(), 1.5)).unwrap();
        assert_eq!(json["yield"], 1.5);
        assert_eq!(json["year"], 2024);
    }
}
