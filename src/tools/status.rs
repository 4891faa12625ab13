//! Status tool
//!
//! Runtime status of the mcal service: build info, configuration summary,
//! query log location, and process information.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::Settings;

/// Instructions returned by the usage_instructions tool
pub const USAGE_INSTRUCTIONS: &str = r#"# Estimating dish calories

1. Call estimate_calories with the dish name and servings eaten, e.g.
   {"dish_name": "grilled chicken salad", "servings": 1.5}.
2. The result carries calories_per_serving, total_calories, and a basis tag
   telling how the energy figure was reported ("per serving (label)",
   "per 100 g", "per 100 g (converted from kJ)", or
   "per serving (derived from per 100 g)").
3. If the answer is "low_confidence" or "dish_not_found", call search_foods
   with the same text to inspect what USDA returned and how each candidate
   scored, then retry with a more specific dish name.
4. recent_queries lists previously logged estimates (when the query log is
   enabled via MCAL_QUERY_LOG_ENABLED).

## Notes

- Servings must be greater than 0; fractional servings are fine.
- Per-100 g figures are scaled by the record's declared serving grams when
  the serving unit is a gram unit; other units are never converted.
- Estimates come from USDA FoodData Central and depend on its data quality.
"#;

/// Runtime status of the mcal service
#[derive(Debug, Clone, Serialize)]
pub struct McalStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Configuration summary (no secrets)
    pub usda_base_url: String,
    pub fuzz_threshold: f64,
    pub query_log_enabled: bool,

    /// Query log database
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, settings: &Settings) -> McalStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        McalStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            usda_base_url: settings.usda_base_url.clone(),
            fuzz_threshold: settings.fuzz_threshold,
            query_log_enabled: settings.query_log_enabled,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
