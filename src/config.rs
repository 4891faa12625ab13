//! Runtime configuration
//!
//! All settings come from environment variables with the MCAL_ prefix.

use std::path::PathBuf;

use thiserror::Error;

/// Default USDA FoodData Central search endpoint
pub const DEFAULT_USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1/foods/search";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Service settings, loaded once at startup and shared by reference
#[derive(Debug, Clone)]
pub struct Settings {
    /// USDA FoodData Central search endpoint
    pub usda_base_url: String,
    /// USDA API key (required)
    pub usda_api_key: String,
    /// Page size requested from the USDA search endpoint
    pub usda_page_size: u32,
    /// HTTP timeout in seconds for USDA requests
    pub usda_timeout_s: u64,
    /// Max retries for USDA requests
    pub usda_retries: u32,
    /// Minimum composite score to accept a match
    pub fuzz_threshold: f64,
    /// Persist successful estimates to the query log
    pub query_log_enabled: bool,
}

impl Settings {
    /// Load settings from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            usda_base_url: env_or("MCAL_USDA_BASE_URL", DEFAULT_USDA_BASE_URL),
            usda_api_key: std::env::var("MCAL_USDA_API_KEY")
                .map_err(|_| ConfigError::Missing("MCAL_USDA_API_KEY"))?,
            usda_page_size: parse_env("MCAL_USDA_PAGE_SIZE", 25)?,
            usda_timeout_s: parse_env("MCAL_USDA_TIMEOUT_S", 10)?,
            usda_retries: parse_env("MCAL_USDA_RETRIES", 3)?,
            fuzz_threshold: parse_env("MCAL_FUZZ_THRESHOLD", 55.0)?,
            query_log_enabled: parse_env("MCAL_QUERY_LOG_ENABLED", false)?,
        })
    }
}

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var("MCAL_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("mcal.db");
            path
        })
}

fn env_or(var: &'static str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(_) => Ok(default),
    }
}
