//! CSKG Graph Store: SQLite persistence for the knowledge graph.
//!
//! Exposes the capability surface the importer and the query engine build
//! on: a connection pool, schema migrations, row-level writes carrying the
//! graph's conflict policies, and the maintenance operations used around
//! bulk loads (truncate, index suspension, foreign-key toggling).

pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{DbError, DbPool, DbResult};
