//! Query log tools
//!
//! Read access to previously logged estimates.

use serde::Serialize;

use crate::db::Database;
use crate::models::QueryLogEntry;

/// Response for recent_queries
#[derive(Debug, Serialize)]
pub struct RecentQueriesResponse {
    pub entries: Vec<QueryLogEntry>,
    pub total: usize,
}

/// List the most recent logged estimates, newest first
pub fn recent_queries(db: &Database, limit: i64) -> Result<RecentQueriesResponse, String> {
    let limit = limit.clamp(1, 200);
    let entries = db
        .with_conn(|conn| QueryLogEntry::list_recent(conn, limit))
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(RecentQueriesResponse {
        total: entries.len(),
        entries,
    })
}
