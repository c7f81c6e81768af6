//! Database schema, migrations, and query builders.
//!
//! Every statement is built with sea-query against the [`tables`] identifiers
//! and returned as a `(sql, values)` pair for the server to bind and execute.
//! Inserts, updates, and deletes use `RETURNING *` so each write hands back
//! the resulting row (or proves no row matched).

pub mod ideas;
pub mod migrations;
pub mod projects;
pub mod sparks;
pub mod statuses;
pub mod tables;
pub mod tasks;
pub mod users;

pub use tables::*;

/// A built statement: SQL text plus its bind values.
pub type Built = (String, sea_query::Values);
