//! Node-level store operations.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

/// Node row from the database.
#[derive(Debug, Clone, Serialize)]
pub struct NodeRow {
    pub id: String,
    pub label: String,
}

/// Upsert SQL shared by single and batched writes. On id collision the
/// stored label is replaced only when the incoming one is strictly shorter;
/// ties keep the existing label.
pub const UPSERT_NODE_SQL: &str = "\
INSERT INTO nodes (node_id, node_label) VALUES (?1, ?2)
ON CONFLICT(node_id) DO UPDATE SET node_label = excluded.node_label
WHERE length(excluded.node_label) < length(nodes.node_label)";

/// Insert or update a single node.
pub fn upsert_node(pool: &DbPool, id: &str, label: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(UPSERT_NODE_SQL, params![id, label])?;
        Ok(())
    })
}

/// Get a node by id.
pub fn get_node(pool: &DbPool, id: &str) -> DbResult<NodeRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT node_id, node_label FROM nodes WHERE node_id = ?1",
            params![id],
            |row| {
                Ok(NodeRow {
                    id: row.get(0)?,
                    label: row.get(1)?,
                })
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Node: {}", id)),
            e => DbError::Connection(e),
        })
    })
}

/// Check whether a node exists.
pub fn node_exists(pool: &DbPool, id: &str) -> DbResult<bool> {
    pool.with_conn(|conn| {
        let found = conn
            .query_row(
                "SELECT 1 FROM nodes WHERE node_id = ?1",
                params![id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    })
}

/// Total number of nodes.
pub fn node_count(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))
            .map_err(DbError::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        run_migrations(&pool).unwrap();
        pool
    }

    #[test]
    fn test_upsert_keeps_shorter_label() {
        let pool = pool();

        upsert_node(&pool, "/c/en/cat", "cat").unwrap();
        upsert_node(&pool, "/c/en/cat", "c").unwrap();
        assert_eq!(get_node(&pool, "/c/en/cat").unwrap().label, "c");

        upsert_node(&pool, "/c/en/cat", "cat").unwrap();
        assert_eq!(get_node(&pool, "/c/en/cat").unwrap().label, "c");
    }

    #[test]
    fn test_upsert_keeps_existing_on_tie() {
        let pool = pool();

        upsert_node(&pool, "/c/en/dog", "dog").unwrap();
        upsert_node(&pool, "/c/en/dog", "pup").unwrap();
        assert_eq!(get_node(&pool, "/c/en/dog").unwrap().label, "dog");
    }

    #[test]
    fn test_get_missing_node() {
        let pool = pool();
        assert!(matches!(
            get_node(&pool, "/c/en/ghost"),
            Err(DbError::NotFound(_))
        ));
        assert!(!node_exists(&pool, "/c/en/ghost").unwrap());
    }
}
