//! Query log model
//!
//! Persists successful estimates when MCAL_QUERY_LOG_ENABLED is set.

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::db::DbResult;

/// A logged calorie estimate
#[derive(Debug, Clone, Serialize)]
pub struct QueryLogEntry {
    pub id: i64,
    pub dish_name: String,
    pub servings: f64,
    pub calories_per_serving: f64,
    pub total_calories: f64,
    pub match_score: f64,
    pub basis: String,
    pub created_at: String,
}

/// Data for inserting a query log row
#[derive(Debug, Clone)]
pub struct QueryLogNew<'a> {
    pub dish_name: &'a str,
    pub servings: f64,
    pub calories_per_serving: f64,
    pub total_calories: f64,
    pub match_score: f64,
    pub basis: &'a str,
}

impl QueryLogEntry {
    /// Create a QueryLogEntry from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            dish_name: row.get("dish_name")?,
            servings: row.get("servings")?,
            calories_per_serving: row.get("calories_per_serving")?,
            total_calories: row.get("total_calories")?,
            match_score: row.get("match_score")?,
            basis: row.get("basis")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new row and return its id
    pub fn create(conn: &Connection, data: &QueryLogNew) -> DbResult<i64> {
        let created_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        conn.execute(
            "INSERT INTO query_log
                (dish_name, servings, calories_per_serving, total_calories, match_score, basis, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                data.dish_name,
                data.servings,
                data.calories_per_serving,
                data.total_calories,
                data.match_score,
                data.basis,
                created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List the most recent entries, newest first
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<QueryLogEntry>> {
        let mut stmt = conn.prepare(
            "SELECT id, dish_name, servings, calories_per_serving, total_calories,
                    match_score, basis, created_at
             FROM query_log
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], Self::from_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
