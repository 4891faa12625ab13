//! Database module
//!
//! SQLite connection handling and migrations for the query log.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
