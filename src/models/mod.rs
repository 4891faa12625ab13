//! Data models
//!
//! Wire types for USDA records, estimate results, and the query log.

mod estimate;
mod food_record;
mod query_log;

pub use estimate::{CalorieEstimate, SOURCE_USDA};
pub use food_record::{FoodNutrient, FoodRecord, LabelNutrients, LabelValue, SearchResponse};
pub use query_log::{QueryLogEntry, QueryLogNew};
