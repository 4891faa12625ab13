//! Meal Calorie Estimator (mcal) Library
//!
//! Core functionality for estimating dish calories from USDA FoodData Central.

pub mod build_info;
pub mod config;
pub mod db;
pub mod matching;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod provider;
pub mod tools;
