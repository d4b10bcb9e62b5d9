//! Maintenance operations used around bulk loads.

use crate::pool::{DbError, DbPool, DbResult};

/// Remove all graph data. Edges go first so referential integrity holds
/// while the delete runs.
pub fn truncate_all(pool: &DbPool) -> DbResult<()> {
    tracing::info!("clearing existing graph data");
    pool.with_conn(|conn| {
        conn.execute("DELETE FROM edges", [])?;
        conn.execute("DELETE FROM nodes", [])?;
        Ok(())
    })
}

/// Drop the two non-primary-key edge indexes ahead of a bulk load.
pub fn drop_edge_indexes(pool: &DbPool) -> DbResult<()> {
    tracing::debug!("dropping edge indexes");
    pool.with_conn(|conn| {
        conn.execute_batch(
            "DROP INDEX IF EXISTS node1_idx;
             DROP INDEX IF EXISTS node2_idx;",
        )?;
        Ok(())
    })
}

/// Recreate the edge indexes dropped by [`drop_edge_indexes`].
pub fn create_edge_indexes(pool: &DbPool) -> DbResult<()> {
    tracing::debug!("recreating edge indexes");
    pool.with_conn(|conn| {
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS node1_idx ON edges (node1_id);
             CREATE INDEX IF NOT EXISTS node2_idx ON edges (node2_id);",
        )?;
        Ok(())
    })
}

/// Toggle foreign-key enforcement. SQLite cannot drop a named constraint,
/// so suspending the edge endpoint constraints means flipping this pragma.
/// The pragma is a no-op while a transaction is open.
pub fn set_foreign_keys(pool: &DbPool, enabled: bool) -> DbResult<()> {
    tracing::debug!(enabled, "toggling foreign-key enforcement");
    pool.with_conn(|conn| {
        conn.pragma_update(None, "foreign_keys", enabled)?;
        Ok(())
    })
}

/// Whether foreign-key enforcement is currently on.
pub fn foreign_keys_enabled(pool: &DbPool) -> DbResult<bool> {
    pool.with_conn(|conn| {
        let on: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .map_err(DbError::from)?;
        Ok(on != 0)
    })
}

/// Whether the two edge indexes are present.
pub fn edge_indexes_present(pool: &DbPool) -> DbResult<bool> {
    pool.with_conn(|conn| {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'index' AND name IN ('node1_idx', 'node2_idx')",
                [],
                |row| row.get(0),
            )
            .map_err(DbError::from)?;
        Ok(count == 2)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::queries::{edges::insert_edge, nodes::upsert_node};

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        run_migrations(&pool).unwrap();
        pool
    }

    #[test]
    fn test_truncate_edges_then_nodes() {
        let pool = pool();
        upsert_node(&pool, "a", "a").unwrap();
        upsert_node(&pool, "b", "b").unwrap();
        insert_edge(&pool, 0, "a", "b", "/r/IsA", "is a").unwrap();

        truncate_all(&pool).unwrap();
        assert_eq!(crate::queries::nodes::node_count(&pool).unwrap(), 0);
        assert_eq!(crate::queries::edges::edge_count(&pool).unwrap(), 0);

        // Re-running on an empty store is a no-op.
        truncate_all(&pool).unwrap();
    }

    #[test]
    fn test_index_drop_and_restore() {
        let pool = pool();
        assert!(edge_indexes_present(&pool).unwrap());

        drop_edge_indexes(&pool).unwrap();
        assert!(!edge_indexes_present(&pool).unwrap());

        create_edge_indexes(&pool).unwrap();
        assert!(edge_indexes_present(&pool).unwrap());
    }

    #[test]
    fn test_foreign_key_toggle() {
        let pool = pool();
        assert!(foreign_keys_enabled(&pool).unwrap());

        set_foreign_keys(&pool, false).unwrap();
        assert!(!foreign_keys_enabled(&pool).unwrap());

        // With enforcement off, a dangling edge is accepted.
        insert_edge(&pool, 7, "nope", "nada", "/r/IsA", "is a").unwrap();

        set_foreign_keys(&pool, true).unwrap();
        assert!(foreign_keys_enabled(&pool).unwrap());
    }
}
