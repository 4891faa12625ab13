//! USDA food record wire types
//!
//! Deserialized from the FoodData Central search response. The shape is
//! semi-structured: energy may live under labelNutrients (per serving) or in
//! the foodNutrients list (per 100 g), and serving size fields are optional.

use serde::{Deserialize, Serialize};

/// Top-level USDA search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub foods: Vec<FoodRecord>,
}

/// One nutrition-database entry returned by the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    #[serde(default)]
    pub description: String,
    pub label_nutrients: Option<LabelNutrients>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
    pub serving_size: Option<f64>,
    pub serving_size_unit: Option<String>,
    /// Comma-joined ingredient statement, present on branded foods
    pub ingredients: Option<String>,
}

/// Per-serving label nutrients (branded foods only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelNutrients {
    pub calories: Option<LabelValue>,
}

/// A single label nutrient value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelValue {
    pub value: Option<f64>,
}

/// One entry in the foodNutrients list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodNutrient {
    #[serde(rename = "nutrientName")]
    pub nutrient_name: Option<String>,
    #[serde(rename = "unitName")]
    pub unit_name: Option<String>,
    pub value: Option<f64>,
}

impl FoodRecord {
    /// Per-serving label calorie value, if present and numeric
    pub fn label_calories(&self) -> Option<f64> {
        self.label_nutrients
            .as_ref()
            .and_then(|l| l.calories.as_ref())
            .and_then(|c| c.value)
    }
}
