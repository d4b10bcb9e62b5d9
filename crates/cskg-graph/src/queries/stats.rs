//! Whole-graph statistics.

use std::collections::HashMap;

use cskg_db::queries::nodes;
use cskg_db::{DbError, DbPool};
use rusqlite::params;
use serde::Serialize;

use crate::error::GraphResult;

/// A node with its total degree.
#[derive(Debug, Clone, Serialize)]
pub struct DegreeRow {
    pub id: String,
    pub label: String,
    pub degree: i64,
}

/// Predecessors of a node grouped by predecessor label.
#[derive(Debug, Clone, Serialize)]
pub struct PredecessorGroup {
    pub label: String,
    pub ids: String,
    pub relations: String,
    pub relation_labels: String,
}

/// Total number of nodes.
pub fn node_count(pool: &DbPool) -> GraphResult<i64> {
    Ok(nodes::node_count(pool)?)
}

/// Nodes with no incoming edges.
pub fn source_count(pool: &DbPool) -> GraphResult<i64> {
    scalar(
        pool,
        "SELECT COUNT(*) FROM nodes n
         WHERE NOT EXISTS (SELECT 1 FROM edges e WHERE e.node2_id = n.node_id)",
    )
}

/// Nodes with no outgoing edges.
pub fn sink_count(pool: &DbPool) -> GraphResult<i64> {
    scalar(
        pool,
        "SELECT COUNT(*) FROM nodes n
         WHERE NOT EXISTS (SELECT 1 FROM edges e WHERE e.node1_id = n.node_id)",
    )
}

/// All nodes attaining the maximum degree, where degree is the number of
/// edges touching the node in either direction.
///
/// Two grouped aggregations (by source, by destination) are merged and
/// summed per node id; ties are not broken. An edgeless graph has no
/// maximum and yields an empty result.
pub fn most_connected(pool: &DbPool) -> GraphResult<Vec<DegreeRow>> {
    let mut degrees: HashMap<String, i64> = HashMap::new();

    pool.with_conn(|conn| {
        for sql in [
            "SELECT node1_id, COUNT(*) FROM edges GROUP BY node1_id",
            "SELECT node2_id, COUNT(*) FROM edges GROUP BY node2_id",
        ] {
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (id, count) = row?;
                *degrees.entry(id).or_insert(0) += count;
            }
        }
        Ok(())
    })?;

    let Some(max_degree) = degrees.values().copied().max() else {
        return Ok(Vec::new());
    };

    let mut winners: Vec<String> = degrees
        .into_iter()
        .filter(|(_, degree)| *degree == max_degree)
        .map(|(id, _)| id)
        .collect();
    winners.sort();

    let mut result = Vec::with_capacity(winners.len());
    for id in winners {
        let node = nodes::get_node(pool, &id)?;
        result.push(DegreeRow {
            id: node.id,
            label: node.label,
            degree: max_degree,
        });
    }
    Ok(result)
}

/// Predecessors of `node_id` grouped by their label, with aggregated ids
/// and relation types per group. Scans every edge pointing at the node;
/// this is the most expensive of the simple queries.
pub fn predecessor_groups(pool: &DbPool, node_id: &str) -> GraphResult<Vec<PredecessorGroup>> {
    const SQL: &str = "\
SELECT n.node_label,
       GROUP_CONCAT(DISTINCT e.node1_id ORDER BY e.node1_id) AS ids,
       GROUP_CONCAT(DISTINCT e.relation ORDER BY e.relation) AS relations,
       GROUP_CONCAT(DISTINCT e.relation_label ORDER BY e.relation_label) AS relation_labels
FROM edges e
JOIN nodes n ON n.node_id = e.node1_id
WHERE e.node2_id = ?1
GROUP BY n.node_label
ORDER BY n.node_label";

    let rows = pool.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(SQL)?;
        let rows = stmt.query_map(params![node_id], |row| {
            Ok(PredecessorGroup {
                label: row.get(0)?,
                ids: row.get(1)?,
                relations: row.get(2)?,
                relation_labels: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })?;
    Ok(rows)
}

fn scalar(pool: &DbPool, sql: &str) -> GraphResult<i64> {
    let count = pool.with_conn(|conn| {
        conn.query_row(sql, [], |row| row.get(0)).map_err(DbError::from)
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
    fn test_counts() {
        let pool = seeded_pool(&[
            ("a", "b", "/r/IsA"),
            ("b", "c", "/r/IsA"),
        ]);

        assert_eq!(node_count(&pool).unwrap(), 3);
        // "a" has no incoming edges, "c" has no outgoing edges.
        assert_eq!(source_count(&pool).unwrap(), 1);
        assert_eq!(sink_count(&pool).unwrap(), 1);
    }

    #[test]
    fn test_most_connected_single_winner() {
        let pool = seeded_pool(&[
            ("a", "b", "/r/IsA"),
            ("a", "c", "/r/IsA"),
            ("d", "a", "/r/IsA"),
        ]);

        let rows = most_connected(&pool).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[0].degree, 3);
    }

    #[test]
    fn test_most_connected_reports_all_ties() {
        let pool = seeded_pool(&[
            ("a", "b", "/r/IsA"),
            ("c", "d", "/r/IsA"),
        ]);

        let rows = most_connected(&pool).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
        assert!(rows.iter().all(|r| r.degree == 1));
    }

    #[test]
    fn test_most_connected_empty_graph() {
        let pool = seeded_pool(&[]);
        assert!(most_connected(&pool).unwrap().is_empty());
    }

    #[test]
    fn test_predecessor_groups_by_label() {
        let pool = seeded_pool(&[
            ("cat", "animal", "/r/IsA"),
            ("dog", "animal", "/r/IsA"),
        ]);
        // Two predecessors sharing one label collapse into one group.
        pool.with_conn(|conn| {
            conn.execute("UPDATE nodes SET node_label = 'pet' WHERE node_id IN ('cat', 'dog')", [])?;
            Ok(())
        })
        .unwrap();

        let groups = predecessor_groups(&pool, "animal").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "pet");
        assert_eq!(groups[0].ids, "cat,dog");
        assert_eq!(groups[0].relations, "/r/IsA");
    }
}
