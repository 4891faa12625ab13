//! mcal MCP Server Implementation
//!
//! Exposes the calorie estimator over MCP: estimate_calories, search_foods,
//! recent_queries, and status tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::db::Database;
use crate::matching::{EstimateError, MatchEngine};
use crate::provider::FoodSearch;
use crate::tools::status::{StatusTracker, USAGE_INSTRUCTIONS};
use crate::tools::{calories, queries};

/// mcal MCP Service
#[derive(Clone)]
pub struct McalService {
    settings: Arc<Settings>,
    engine: Arc<MatchEngine>,
    provider: Arc<dyn FoodSearch>,
    database: Database,
    status_tracker: Arc<StatusTracker>,
    tool_router: ToolRouter<McalService>,
}

impl McalService {
    pub fn new(
        settings: Arc<Settings>,
        provider: Arc<dyn FoodSearch>,
        database: Database,
        database_path: PathBuf,
    ) -> Self {
        Self {
            settings,
            engine: Arc::new(MatchEngine::default()),
            provider,
            database,
            status_tracker: Arc::new(StatusTracker::new(database_path)),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateCaloriesParams {
    /// Free-text dish name, e.g. "grilled chicken salad"
    pub dish_name: String,
    /// Number of servings eaten; must be greater than 0
    pub servings: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Free-text food query
    pub query: String,
    /// Max scored candidates to return
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize { 10 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecentQueriesParams {
    /// Max entries to return (newest first)
    #[serde(default = "default_recent_limit")]
    pub limit: i64,
}

fn default_recent_limit() -> i64 { 20 }

// ============================================================================
// Error Payloads
// ============================================================================

/// Structured failure returned as tool content, so the caller can react to
/// the kind (retry with a better dish name, surface "unavailable", etc.)
#[derive(Debug, Serialize)]
struct EstimateErrorResponse {
    error: &'static str,
    message: String,
}

impl EstimateErrorResponse {
    fn from_error(err: &EstimateError) -> Self {
        let kind = match err {
            EstimateError::NotFound => "dish_not_found",
            EstimateError::LowConfidence { .. } => "low_confidence",
            EstimateError::EnergyMissing => "energy_missing",
            EstimateError::Provider(_) => "provider_unavailable",
        };
        Self {
            error: kind,
            message: err.to_string(),
        }
    }
}

fn json_content<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl McalService {
    // --- Status ---

    #[tool(description = "Get the current status of the mcal service including build info, configuration, query log location, and process information")]
    fn get_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.status_tracker.get_status(&self.settings);
        json_content(&status)
    }

    #[tool(description = "Get step-by-step instructions for estimating dish calories. Call this when starting a session or when unsure how to use the estimation tools.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            USAGE_INSTRUCTIONS,
        )]))
    }

    // --- Calorie Estimation ---

    #[tool(description = "Estimate calories for a named dish using USDA FoodData Central. Returns calories per serving, total calories for the given servings, the basis of the figure, and ingredients when available. Failures come back as a structured error object (dish_not_found, low_confidence, energy_missing, provider_unavailable).")]
    async fn estimate_calories(
        &self,
        Parameters(p): Parameters<EstimateCaloriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let dish_name = p.dish_name.trim();
        if dish_name.is_empty() {
            return Err(McpError::invalid_params("dish_name cannot be empty", None));
        }
        if !(p.servings > 0.0) {
            return Err(McpError::invalid_params(
                "servings must be greater than 0",
                None,
            ));
        }

        let query_log = self
            .settings
            .query_log_enabled
            .then_some(&self.database);

        let result = calories::estimate_calories(
            self.provider.as_ref(),
            &self.engine,
            query_log,
            dish_name,
            p.servings,
            self.settings.fuzz_threshold,
        )
        .await;

        match result {
            Ok(estimate) => json_content(&estimate),
            Err(err) => json_content(&EstimateErrorResponse::from_error(&err)),
        }
    }

    #[tool(description = "Search USDA FoodData Central and return candidates scored against the query, best first. Useful to inspect why an estimate came back low_confidence or dish_not_found.")]
    async fn search_foods(
        &self,
        Parameters(p): Parameters<SearchFoodsParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = p.query.trim();
        if query.is_empty() {
            return Err(McpError::invalid_params("query cannot be empty", None));
        }

        match calories::search_foods(self.provider.as_ref(), &self.engine, query, p.limit).await {
            Ok(response) => json_content(&response),
            Err(err) => json_content(&EstimateErrorResponse::from_error(&err.into())),
        }
    }

    // --- Query Log ---

    #[tool(description = "List recently logged calorie estimates, newest first. The log only fills up when MCAL_QUERY_LOG_ENABLED is set.")]
    fn recent_queries(
        &self,
        Parameters(p): Parameters<RecentQueriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = queries::recent_queries(&self.database, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_content(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for McalService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcal".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Meal Calorie Estimator".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Meal Calorie Estimator (mcal) - dish calorie estimation backed by USDA FoodData Central. \
                 IMPORTANT: Call usage_instructions when starting a session. \
                 Estimation: estimate_calories (dish_name + servings). \
                 Inspection: search_foods shows scored candidates for a query. \
                 History: recent_queries lists logged estimates. \
                 Service: get_status reports build, config, and process info."
                    .into(),
            ),
        }
    }
}
