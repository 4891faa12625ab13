//! Meal Calorie Estimator (mcal)
//!
//! An MCP server that estimates dish calories from USDA FoodData Central.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

mod build_info;
mod config;
mod db;
mod matching;
mod mcp;
mod models;
mod nutrition;
mod provider;
mod tools;

use mcp::McalService;
use provider::UsdaClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mcal=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    // Load settings (fails fast on a missing API key)
    let settings = Arc::new(config::Settings::from_env()?);

    // Query log database
    let db_path = config::database_path();
    eprintln!("Query log path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing query log database...");
    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    // USDA search client
    let usda = Arc::new(UsdaClient::new(&settings)?);

    // Create the mcal service
    let service = McalService::new(settings, usda, database, db_path);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
