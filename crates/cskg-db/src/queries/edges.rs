//! Edge-level store operations.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::params;

/// Insert SQL shared by single and batched writes. Duplicate edge ids are
/// ignored, never overwritten.
pub const INSERT_EDGE_SQL: &str = "\
INSERT INTO edges (edge_id, node1_id, node2_id, relation, relation_label)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(edge_id) DO NOTHING";

/// Insert a single edge. Both endpoints must exist while foreign keys are
/// enforced.
pub fn insert_edge(
    pool: &DbPool,
    id: i64,
    src: &str,
    dst: &str,
    relation: &str,
    relation_label: &str,
) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(INSERT_EDGE_SQL, params![id, src, dst, relation, relation_label])?;
        Ok(())
    })
}

/// Total number of edges.
pub fn edge_count(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))
            .map_err(DbError::from)
    })
}
