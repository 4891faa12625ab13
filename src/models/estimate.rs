//! Calorie estimate result model

use serde::{Deserialize, Serialize};

/// Source label attached to every estimate
pub const SOURCE_USDA: &str = "USDA FoodData Central";

/// A completed calorie estimate for a dish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieEstimate {
    pub dish_name: String,
    pub servings: f64,
    /// Rounded to 2 decimal places
    pub calories_per_serving: f64,
    /// calories_per_serving x servings, rounded to 2 decimal places
    pub total_calories: f64,
    pub source: String,
    /// What quantity the energy figure was reported in (e.g. "per serving (label)")
    pub basis: String,
    /// Up to 20 ingredients, when the matched record declares them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}
