//! mcal tools module
//!
//! MCP tool implementations for the Meal Calorie Estimator.

pub mod calories;
pub mod queries;
pub mod status;
