//! Node rename transaction.

use cskg_db::queries::nodes;
use cskg_db::DbPool;
use rusqlite::params;
use serde::Serialize;

use crate::error::{GraphError, GraphResult};

/// Outcome of a rename: how many edges were repointed in each direction.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenameOutcome {
    pub outgoing_repointed: usize,
    pub incoming_repointed: usize,
}

/// Atomically replace node `old_id` with `(new_id, new_label)` everywhere
/// it is referenced.
///
/// Step order is load-bearing: the new node must exist before edges are
/// repointed, and the old node is only deleted once nothing references it,
/// so the delete cascade never touches an edge. Any step failing rolls the
/// whole transaction back; a partial rename is never observable.
pub fn rename_node(
    pool: &DbPool,
    old_id: &str,
    new_id: &str,
    new_label: &str,
) -> GraphResult<RenameOutcome> {
    if nodes::node_exists(pool, new_id)? {
        return Err(GraphError::NodeExists(new_id.to_string()));
    }
    if !nodes::node_exists(pool, old_id)? {
        return Err(GraphError::NodeNotFound(old_id.to_string()));
    }

    let outcome = pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO nodes (node_id, node_label) VALUES (?1, ?2)",
            params![new_id, new_label],
        )?;
        let outgoing = tx.execute(
            "UPDATE edges SET node1_id = ?1 WHERE node1_id = ?2",
            params![new_id, old_id],
        )?;
        let incoming = tx.execute(
            "UPDATE edges SET node2_id = ?1 WHERE node2_id = ?2",
            params![new_id, old_id],
        )?;
        tx.execute("DELETE FROM nodes WHERE node_id = ?1", params![old_id])?;

        tx.commit()?;
        Ok(RenameOutcome {
            outgoing_repointed: outgoing,
            incoming_repointed: incoming,
        })
    })?;

    tracing::info!(old = old_id, new = new_id, "renamed node");
    Ok(outcome)
}
