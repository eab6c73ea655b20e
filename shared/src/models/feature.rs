//! Feature schemas and the feature vector builder
//!
//! A model is only meaningful for vectors built against the exact schema it
//! was trained with, so every schema carries a name and a version and the
//! vector remembers which schema produced it.

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Raw input quantities a schema column can draw from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    Rainfall,
    Temperature,
    FertilizerUsed,
    IrrigationUsed,
    DaysToHarvest,
    Nitrogen,
    Phosphorus,
    Potassium,
    SoilPh,
    Humidity,
    Ndvi,
    Pesticide,
}

/// Anything a feature vector can be assembled from
pub trait FeatureSource {
    /// Raw value for `key`, or `None` when this source does not carry it
    fn feature(&self, key: FeatureKey) -> Option<f64>;
}

/// One named column of a schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureColumn {
    pub name: String,
    pub key: FeatureKey,
}

impl FeatureColumn {
    pub fn new(name: &str, key: FeatureKey) -> Self {
        Self {
            name: name.to_string(),
            key,
        }
    }
}

/// Ordered, named, versioned list of model input columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureSchema {
    pub name: String,
    pub version: u32,
    pub columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub const CROP_YIELD: &'static str = "crop_yield";
    pub const FIELD_SERVICE: &'static str = "field_service";
    pub const SOIL_DEMO: &'static str = "soil_demo";

    /// Dashboard yield model columns
    pub fn crop_yield_v1() -> Self {
        Self {
            name: Self::CROP_YIELD.to_string(),
            version: 1,
            columns: vec![
                FeatureColumn::new("Rainfall_mm", FeatureKey::Rainfall),
                FeatureColumn::new("Temperature_Celsius", FeatureKey::Temperature),
                FeatureColumn::new("Fertilizer_Used", FeatureKey::FertilizerUsed),
                FeatureColumn::new("Irrigation_Used", FeatureKey::IrrigationUsed),
                FeatureColumn::new("Days_to_Harvest", FeatureKey::DaysToHarvest),
            ],
        }
    }

    /// Columns of the model served by the HTTP prediction endpoint
    pub fn field_service_v1() -> Self {
        Self {
            name: Self::FIELD_SERVICE.to_string(),
            version: 1,
            columns: vec![
                FeatureColumn::new("Rainfall", FeatureKey::Rainfall),
                FeatureColumn::new("Temperature", FeatureKey::Temperature),
                FeatureColumn::new("Pesticide", FeatureKey::Pesticide),
            ],
        }
    }

    /// Inputs of the hand-written demo formula
    pub fn soil_demo_v1() -> Self {
        Self {
            name: Self::SOIL_DEMO.to_string(),
            version: 1,
            columns: vec![
                FeatureColumn::new("nitrogen", FeatureKey::Nitrogen),
                FeatureColumn::new("phosphorus", FeatureKey::Phosphorus),
                FeatureColumn::new("potassium", FeatureKey::Potassium),
                FeatureColumn::new("rainfall", FeatureKey::Rainfall),
                FeatureColumn::new("soil_ph", FeatureKey::SoilPh),
                FeatureColumn::new("ndvi", FeatureKey::Ndvi),
            ],
        }
    }

    /// Look up a built-in schema by its `name_vN` identifier
    pub fn by_id(id: &str) -> Option<Self> {
        [
            Self::crop_yield_v1(),
            Self::field_service_v1(),
            Self::soil_demo_v1(),
        ]
        .into_iter()
        .find(|schema| schema.id() == id)
    }

    /// `name_vN`
    pub fn id(&self) -> String {
        format!("{}_v{}", self.name, self.version)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Build a single-row vector from `source` in schema order
    ///
    /// Values are copied as-is: no scaling, rounding or imputation.
    pub fn build<S: FeatureSource + ?Sized>(&self, source: &S) -> Result<FeatureVector, FeatureError> {
        let values = self
            .columns
            .iter()
            .map(|column| {
                source
                    .feature(column.key)
                    .ok_or_else(|| FeatureError::SchemaMismatch {
                        schema: self.id(),
                        field: column.name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureVector {
            schema: self.clone(),
            values,
        })
    }
}

/// A single row of model input, tied to the schema that built it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of the named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema
            .columns
            .iter()
            .position(|c| c.name == column)
            .map(|i| self.values[i])
    }
}
