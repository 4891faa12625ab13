//! Energy extraction from USDA food records
//!
//! A record can carry energy as a per-serving label value (branded foods) or
//! as a per-100 g entry in the nutrient list, in kcal or kJ. Extraction
//! checks those shapes in priority order and tags the result with its basis.

use std::fmt;

use serde::Serialize;

use crate::models::FoodRecord;

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;

/// What quantity an extracted energy figure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnergyBasis {
    /// Label calories, already per serving
    PerServingLabel,
    /// Nutrient-list kcal, per 100 g of food
    Per100g,
    /// Nutrient-list kJ converted to kcal, per 100 g of food
    Per100gFromKj,
    /// Per 100 g value scaled by the declared serving grams
    PerServingDerived,
}

impl EnergyBasis {
    /// Whether the figure already refers to one serving
    pub fn is_per_serving(self) -> bool {
        matches!(self, Self::PerServingLabel | Self::PerServingDerived)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PerServingLabel => "per serving (label)",
            Self::Per100g => "per 100 g",
            Self::Per100gFromKj => "per 100 g (converted from kJ)",
            Self::PerServingDerived => "per serving (derived from per 100 g)",
        }
    }
}

impl fmt::Display for EnergyBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract an energy figure in kcal from a food record.
///
/// Priority: per-serving label calories, then the first nutrient-list entry
/// whose name contains "energy" with a numeric value and a recognized unit.
/// Energy entries in unrecognized units are skipped, not fatal.
pub fn find_energy_kcal(food: &FoodRecord) -> Option<(f64, EnergyBasis)> {
    if let Some(value) = food.label_calories() {
        return Some((value, EnergyBasis::PerServingLabel));
    }

    for nutrient in &food.food_nutrients {
        let Some(value) = nutrient.value else {
            continue;
        };
        let name = nutrient.nutrient_name.as_deref().unwrap_or("").to_lowercase();
        if !name.contains("energy") {
            continue;
        }
        let unit = nutrient.unit_name.as_deref().unwrap_or("").to_lowercase();
        match unit.as_str() {
            "kcal" | "kcals" => return Some((value, EnergyBasis::Per100g)),
            "kj" | "kilojoules" => {
                return Some((value / KJ_PER_KCAL, EnergyBasis::Per100gFromKj))
            }
            _ => {}
        }
    }

    None
}

/// Declared serving size in grams, if the record uses a gram-family unit.
///
/// Any other unit (cup, oz, ...) yields None; no unit conversion is
/// attempted.
pub fn serving_grams(food: &FoodRecord) -> Option<f64> {
    let size = food.serving_size?;
    let unit = food.serving_size_unit.as_deref()?.trim().to_lowercase();
    match unit.as_str() {
        "g" | "gram" | "grams" => Some(size),
        _ => None,
    }
}
