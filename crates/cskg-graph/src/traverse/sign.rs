//! Sign-propagating bounded traversal: distant synonyms and antonyms.

use std::collections::HashMap;

use cskg_db::queries::nodes;
use cskg_db::{DbError, DbPool};
use rusqlite::params;
use serde::Serialize;

use crate::error::{GraphError, GraphResult};

/// Relation followed without flipping the accumulated sign.
pub const SYNONYM_RELATION: &str = "/r/Synonym";
/// Relation that flips the accumulated sign.
pub const ANTONYM_RELATION: &str = "/r/Antonym";

/// Cumulative sign of a path through synonym/antonym edges, with +1/-1
/// multiplication semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sign {
    Synonym,
    Antonym,
}

impl Sign {
    /// Sign multiplication: a synonym edge preserves the accumulated sign,
    /// an antonym edge flips it.
    fn cross(self, edge: Sign) -> Sign {
        match edge {
            Sign::Synonym => self,
            Sign::Antonym => self.flip(),
        }
    }

    fn flip(self) -> Sign {
        match self {
            Sign::Synonym => Sign::Antonym,
            Sign::Antonym => Sign::Synonym,
        }
    }

    fn of_relation(relation: &str) -> Sign {
        if relation == ANTONYM_RELATION {
            Sign::Antonym
        } else {
            Sign::Synonym
        }
    }
}

/// A node reached at the requested distance and sign, with the labels of
/// its representative (shortest, first-found) path from the start.
#[derive(Debug, Clone, Serialize)]
pub struct DistantNode {
    pub id: String,
    pub label: String,
    pub path: Vec<String>,
}

/// All nodes reachable from `start` in exactly `distance` synonym/antonym
/// hops (either direction) whose accumulated sign matches `sign`.
///
/// Every `(node, sign)` pair keeps only its first arrival, so a node is
/// reported at most once per sign and only at its shortest distance for
/// that sign; the tie between equal-length paths goes to traversal order.
pub fn distant_relatives(
    pool: &DbPool,
    start: &str,
    distance: u32,
    sign: Sign,
) -> GraphResult<Vec<DistantNode>> {
    if distance == 0 {
        return Err(GraphError::InvalidDistance(distance));
    }

    // (node, accumulated sign) -> (level first reached, back-pointer)
    type Key = (String, Sign);
    let mut best: HashMap<Key, (u32, Option<Key>)> = HashMap::new();
    let mut frontier: Vec<Key> = vec![(start.to_string(), Sign::Synonym)];
    best.insert(frontier[0].clone(), (0, None));

    for level in 0..distance {
        let mut next_frontier: Vec<Key> = Vec::new();

        for entry in frontier {
            for (neighbor, edge_sign) in signed_neighbors(pool, &entry.0)? {
                let key = (neighbor, entry.1.cross(edge_sign));
                if best.contains_key(&key) {
                    continue;
                }
                best.insert(key.clone(), (level + 1, Some(entry.clone())));
                next_frontier.push(key);
            }
        }

        frontier = next_frontier;
    }

    let mut matched: Vec<String> = best
        .iter()
        .filter(|((id, s), (level, _))| *s == sign && *level == distance && id.as_str() != start)
        .map(|((id, _), _)| id.clone())
        .collect();
    matched.sort();

    let mut result = Vec::with_capacity(matched.len());
    for id in matched {
        let path = trace_path(pool, &best, &(id.clone(), sign))?;
        let node = nodes::get_node(pool, &id)?;
        result.push(DistantNode {
            id: node.id,
            label: node.label,
            path,
        });
    }
    Ok(result)
}

/// One store round trip: synonym/antonym edges touching `node`, each
/// yielding the far endpoint and the edge's own sign.
fn signed_neighbors(pool: &DbPool, node: &str) -> GraphResult<Vec<(String, Sign)>> {
    const SQL: &str = "\
SELECT CASE WHEN node1_id = ?1 THEN node2_id ELSE node1_id END AS other, relation
FROM edges
WHERE (node1_id = ?1 OR node2_id = ?1) AND relation IN (?2, ?3)
ORDER BY other";

    let rows = pool.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(SQL)?;
        let rows = stmt.query_map(
            params![node, SYNONYM_RELATION, ANTONYM_RELATION],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })?;

    Ok(rows
        .into_iter()
        .map(|(id, relation)| (id, Sign::of_relation(&relation)))
        .collect())
}

/// Follow back-pointers to the start and return the path as node labels.
fn trace_path(
    pool: &DbPool,
    best: &HashMap<(String, Sign), (u32, Option<(String, Sign)>)>,
    end: &(String, Sign),
) -> GraphResult<Vec<String>> {
    let mut ids = vec![end.0.clone()];
    let mut current = end.clone();
    while let Some((_, Some(parent))) = best.get(&current) {
        ids.push(parent.0.clone());
        current = parent.clone();
    }
    ids.reverse();

    let mut labels = Vec::with_capacity(ids.len());
    for id in ids {
        labels.push(nodes::get_node(pool, &id)?.label);
    }
    Ok(labels)
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
    fn test_sign_flips_across_antonym() {
        // a -syn- b -ant- c: at distance 2 c is an antonym, not a synonym.
        let pool = seeded_pool(&[
            ("a", "b", "/r/Synonym"),
            ("b", "c", "/r/Antonym"),
        ]);

        let antonyms = distant_relatives(&pool, "a", 2, Sign::Antonym).unwrap();
        assert_eq!(antonyms.len(), 1);
        assert_eq!(antonyms[0].id, "c");
        assert_eq!(antonyms[0].path, ["a", "b", "c"]);

        let synonyms = distant_relatives(&pool, "a", 2, Sign::Synonym).unwrap();
        assert!(synonyms.iter().all(|n| n.id != "c"));
    }

    #[test]
    fn test_double_antonym_is_synonym() {
        let pool = seeded_pool(&[
            ("a", "b", "/r/Antonym"),
            ("b", "c", "/r/Antonym"),
        ]);

        let synonyms = distant_relatives(&pool, "a", 2, Sign::Synonym).unwrap();
        assert_eq!(synonyms.len(), 1);
        assert_eq!(synonyms[0].id, "c");
    }

    #[test]
    fn test_edges_followed_in_both_directions() {
        // Both edges point away from b; traversal still crosses them.
        let pool = seeded_pool(&[
            ("b", "a", "/r/Synonym"),
            ("b", "c", "/r/Synonym"),
        ]);

        let synonyms = distant_relatives(&pool, "a", 2, Sign::Synonym).unwrap();
        assert_eq!(synonyms.len(), 1);
        assert_eq!(synonyms[0].id, "c");
    }

    #[test]
    fn test_other_relations_ignored() {
        let pool = seeded_pool(&[
            ("a", "b", "/r/Synonym"),
            ("b", "c", "/r/IsA"),
        ]);

        assert!(distant_relatives(&pool, "a", 2, Sign::Synonym)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_node_only_reported_at_shortest_distance() {
        // b is one hop from a, and also reachable in three hops with the
        // same sign via the a-b-c-b cycle being pruned.
        let pool = seeded_pool(&[
            ("a", "b", "/r/Synonym"),
            ("b", "c", "/r/Synonym"),
            ("c", "d", "/r/Synonym"),
        ]);

        let at_three = distant_relatives(&pool, "a", 3, Sign::Synonym).unwrap();
        let ids: Vec<&str> = at_three.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["d"]);
    }

    #[test]
    fn test_zero_distance_rejected() {
        let pool = seeded_pool(&[("a", "b", "/r/Synonym")]);
        assert!(matches!(
            distant_relatives(&pool, "a", 0, Sign::Synonym),
            Err(GraphError::InvalidDistance(0))
        ));
    }

    #[test]
    fn test_start_never_reported() {
        // a-b-a round trip would put the start at distance 2.
        let pool = seeded_pool(&[("a", "b", "/r/Synonym")]);

        let at_two = distant_relatives(&pool, "a", 2, Sign::Synonym).unwrap();
        assert!(at_two.is_empty());
    }
}
