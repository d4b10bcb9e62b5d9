//! Query engine error types.

use thiserror::Error;

/// Errors surfaced by query engine operations. Parameter problems are
/// caught before any store query is issued.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node already exists: {0}")]
    NodeExists(String),

    #[error("Invalid distance: {0} (must be at least 1)")]
    InvalidDistance(u32),

    #[error("Database error: {0}")]
    Db(#[from] cskg_db::DbError),
}

/// Result type for query engine operations.
pub type GraphResult<T> = Result<T, GraphError>;
