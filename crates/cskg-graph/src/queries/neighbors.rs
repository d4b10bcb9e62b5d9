//! Neighbor lookup queries.
//!
//! All of these join edges to nodes on the far endpoint and aggregate
//! multiple relations between the same pair into one comma-joined string
//! per distinct neighbor.

use cskg_db::{DbError, DbPool};
use rusqlite::params;
use serde::Serialize;

use crate::error::GraphResult;

/// A distinct neighbor with its aggregated relations.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborRow {
    pub id: String,
    pub label: String,
    pub relations: String,
    pub relation_labels: String,
}

/// A node reachable in two hops.
#[derive(Debug, Clone, Serialize)]
pub struct TwoHopRow {
    pub id: String,
    pub label: String,
    pub relation_label: String,
}

const SUCCESSORS_SQL: &str = "\
SELECT e.node2_id, n.node_label,
       GROUP_CONCAT(DISTINCT e.relation ORDER BY e.relation) AS relations,
       GROUP_CONCAT(DISTINCT e.relation_label ORDER BY e.relation_label) AS relation_labels
FROM edges e
JOIN nodes n ON n.node_id = e.node2_id
WHERE e.node1_id = ?1
GROUP BY e.node2_id, n.node_label
ORDER BY e.node2_id";

const PREDECESSORS_SQL: &str = "\
SELECT e.node1_id, n.node_label,
       GROUP_CONCAT(DISTINCT e.relation ORDER BY e.relation) AS relations,
       GROUP_CONCAT(DISTINCT e.relation_label ORDER BY e.relation_label) AS relation_labels
FROM edges e
JOIN nodes n ON n.node_id = e.node1_id
WHERE e.node2_id = ?1
GROUP BY e.node1_id, n.node_label
ORDER BY e.node1_id";

const NEIGHBORS_SQL: &str = "\
SELECT t.node_id, n.node_label,
       GROUP_CONCAT(DISTINCT t.relation ORDER BY t.relation) AS relations,
       GROUP_CONCAT(DISTINCT t.relation_label ORDER BY t.relation_label) AS relation_labels
FROM (
    SELECT node2_id AS node_id, relation, relation_label FROM edges WHERE node1_id = ?1
    UNION
    SELECT node1_id AS node_id, relation, relation_label FROM edges WHERE node2_id = ?1
) t
JOIN nodes n ON n.node_id = t.node_id
GROUP BY t.node_id, n.node_label
ORDER BY t.node_id";

const TWO_HOP_SUCCESSORS_SQL: &str = "\
SELECT DISTINCT e.node2_id, n.node_label, e.relation_label
FROM edges e
JOIN nodes n ON n.node_id = e.node2_id
WHERE e.node1_id IN (SELECT node2_id FROM edges WHERE node1_id = ?1)
  AND e.node2_id <> ?1
ORDER BY e.node2_id";

const TWO_HOP_PREDECESSORS_SQL: &str = "\
SELECT DISTINCT e.node1_id, n.node_label, e.relation_label
FROM edges e
JOIN nodes n ON n.node_id = e.node1_id
WHERE e.node2_id IN (SELECT node1_id FROM edges WHERE node2_id = ?1)
  AND e.node1_id <> ?1
ORDER BY e.node1_id";

/// Nodes this node points to.
pub fn successors(pool: &DbPool, node_id: &str) -> GraphResult<Vec<NeighborRow>> {
    neighbor_query(pool, SUCCESSORS_SQL, node_id)
}

/// Nodes pointing to this node.
pub fn predecessors(pool: &DbPool, node_id: &str) -> GraphResult<Vec<NeighborRow>> {
    neighbor_query(pool, PREDECESSORS_SQL, node_id)
}

/// Nodes connected in either direction, deduplicated per neighbor.
pub fn neighbors(pool: &DbPool, node_id: &str) -> GraphResult<Vec<NeighborRow>> {
    neighbor_query(pool, NEIGHBORS_SQL, node_id)
}

/// Number of outgoing edges.
pub fn successor_count(pool: &DbPool, node_id: &str) -> GraphResult<i64> {
    count_query(pool, "SELECT COUNT(*) FROM edges WHERE node1_id = ?1", node_id)
}

/// Number of incoming edges.
pub fn predecessor_count(pool: &DbPool, node_id: &str) -> GraphResult<i64> {
    count_query(pool, "SELECT COUNT(*) FROM edges WHERE node2_id = ?1", node_id)
}

/// Number of distinct neighbors in either direction.
pub fn neighbor_count(pool: &DbPool, node_id: &str) -> GraphResult<i64> {
    count_query(
        pool,
        "SELECT COUNT(*) FROM (
            SELECT node2_id FROM edges WHERE node1_id = ?1
            UNION
            SELECT node1_id FROM edges WHERE node2_id = ?1
        )",
        node_id,
    )
}

/// Successors of successors, excluding the origin node.
pub fn two_hop_successors(pool: &DbPool, node_id: &str) -> GraphResult<Vec<TwoHopRow>> {
    two_hop_query(pool, TWO_HOP_SUCCESSORS_SQL, node_id)
}

/// Predecessors of predecessors, excluding the origin node.
pub fn two_hop_predecessors(pool: &DbPool, node_id: &str) -> GraphResult<Vec<TwoHopRow>> {
    two_hop_query(pool, TWO_HOP_PREDECESSORS_SQL, node_id)
}

fn neighbor_query(pool: &DbPool, sql: &str, node_id: &str) -> GraphResult<Vec<NeighborRow>> {
    let rows = pool.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params![node_id], |row| {
            Ok(NeighborRow {
                id: row.get(0)?,
                label: row.get(1)?,
                relations: row.get(2)?,
                relation_labels: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })?;
    Ok(rows)
}

fn two_hop_query(pool: &DbPool, sql: &str, node_id: &str) -> GraphResult<Vec<TwoHopRow>> {
    let rows = pool.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params![node_id], |row| {
            Ok(TwoHopRow {
                id: row.get(0)?,
                label: row.get(1)?,
                relation_label: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })?;
    Ok(rows)
}

fn count_query(pool: &DbPool, sql: &str, node_id: &str) -> GraphResult<i64> {
    let count = pool.with_conn(|conn| {
        conn.query_row(sql, params![node_id], |row| row.get(0))
            .map_err(DbError::from)
    })?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cskg_db::migrations::run_migrations;
    use cskg_db::queries::{edges::insert_edge, nodes::upsert_node};

    fn seeded_pool(edge_list: &[(&str, &str, &str)]) -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        run_migrations(&pool).unwrap();
        for (i, (src, dst, relation)) in edge_list.iter().enumerate() {
            for id in [src, dst] {
                upsert_node(&pool, id, id).unwrap();
            }
            insert_edge(&pool, i as i64, src, dst, relation, relation).unwrap();
        }
        pool
    }

    #[test]
    fn test_successors_aggregate_relations() {
        let pool = seeded_pool(&[
            ("cat", "animal", "/r/IsA"),
            ("cat", "animal", "/r/RelatedTo"),
            ("cat", "home", "/r/AtLocation"),
            ("dog", "animal", "/r/IsA"),
        ]);

        let rows = successors(&pool, "cat").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "animal");
        assert_eq!(rows[0].relations, "/r/IsA,/r/RelatedTo");
        assert_eq!(rows[1].id, "home");

        assert_eq!(successor_count(&pool, "cat").unwrap(), 3);
    }

    #[test]
    fn test_predecessors() {
        let pool = seeded_pool(&[
            ("cat", "animal", "/r/IsA"),
            ("dog", "animal", "/r/IsA"),
        ]);

        let rows = predecessors(&pool, "animal").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "cat");
        assert_eq!(rows[1].id, "dog");
        assert_eq!(predecessor_count(&pool, "animal").unwrap(), 2);
        assert_eq!(predecessor_count(&pool, "cat").unwrap(), 0);
    }

    #[test]
    fn test_neighbors_union_both_directions() {
        let pool = seeded_pool(&[
            ("cat", "animal", "/r/IsA"),
            ("kitten", "cat", "/r/IsA"),
            ("cat", "kitten", "/r/RelatedTo"),
        ]);

        let rows = neighbors(&pool, "cat").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "animal");
        assert_eq!(rows[1].id, "kitten");

        assert_eq!(neighbor_count(&pool, "cat").unwrap(), 2);
    }

    #[test]
    fn test_two_hop_excludes_origin() {
        let pool = seeded_pool(&[
            ("a", "b", "/r/IsA"),
            ("b", "c", "/r/IsA"),
            ("b", "a", "/r/IsA"),
        ]);

        let rows = two_hop_successors(&pool, "a").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "c");

        let rows = two_hop_predecessors(&pool, "c").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "a");
    }
}
