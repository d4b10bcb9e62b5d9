//! Similarity queries: nodes sharing a parent or child with the target
//! under the same relation.

use cskg_db::{DbError, DbPool};
use rusqlite::params;
use serde::Serialize;

use crate::error::GraphResult;

/// A node similar to the target, with how and through which relations.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarRow {
    pub id: String,
    pub label: String,
    pub similarity_types: String,
    pub relations: String,
}

const SIMILAR_SQL: &str = "\
WITH common_parents AS (
    SELECT e2.node2_id AS similar_id,
           'common_parent' AS similarity,
           GROUP_CONCAT(DISTINCT e1.relation ORDER BY e1.relation) AS relations
    FROM edges e1
    JOIN edges e2 ON e2.node1_id = e1.node1_id AND e2.relation = e1.relation
    WHERE e1.node2_id = ?1 AND e2.node2_id <> ?1
    GROUP BY e2.node2_id
),
common_children AS (
    SELECT e2.node1_id AS similar_id,
           'common_child' AS similarity,
           GROUP_CONCAT(DISTINCT e1.relation ORDER BY e1.relation) AS relations
    FROM edges e1
    JOIN edges e2 ON e2.node2_id = e1.node2_id AND e2.relation = e1.relation
    WHERE e1.node1_id = ?1 AND e2.node1_id <> ?1
    GROUP BY e2.node1_id
)
SELECT n.node_id, n.node_label,
       GROUP_CONCAT(DISTINCT sim.similarity ORDER BY sim.similarity) AS similarity_types,
       GROUP_CONCAT(DISTINCT sim.relations ORDER BY sim.relations) AS relations
FROM (
    SELECT similar_id, similarity, relations FROM common_parents
    UNION ALL
    SELECT similar_id, similarity, relations FROM common_children
) sim
JOIN nodes n ON n.node_id = sim.similar_id
GROUP BY n.node_id, n.node_label
ORDER BY n.node_label, n.node_id";

/// Nodes that share a parent (same source, same relation) or a child
/// (same destination, same relation) with the target, deduplicated per
/// node with aggregated similarity kinds.
pub fn similar_nodes(pool: &DbPool, node_id: &str) -> GraphResult<Vec<SimilarRow>> {
    let rows = pool.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(SIMILAR_SQL)?;
        let rows = stmt.query_map(params![node_id], |row| {
            Ok(SimilarRow {
                id: row.get(0)?,
                label: row.get(1)?,
                similarity_types: row.get(2)?,
                relations: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })?;
    Ok(rows)
}
