//! Breadth-first shortest path over the stored graph.

use std::collections::{HashMap, HashSet, VecDeque};

use cskg_db::queries::nodes;
use cskg_db::{DbError, DbPool};
use rusqlite::params_from_iter;
use serde::Serialize;

use crate::error::GraphResult;

/// Relations traversed when no caller-supplied allow-list is given.
pub const DEFAULT_RELATIONS: [&str; 7] = [
    "/r/RelatedTo",
    "/r/IsA",
    "/r/PartOf",
    "/r/HasA",
    "/r/UsedFor",
    "/r/CapableOf",
    "/r/AtLocation",
];

/// Default bound on the search depth.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Search configuration.
#[derive(Debug, Clone)]
pub struct PathOptions {
    /// Relations the search may traverse.
    pub relations: Vec<String>,
    /// Depth bound. Hitting it reports "no path within bound", which caps
    /// cost on dense graphs rather than proving global absence.
    pub max_depth: usize,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            relations: DEFAULT_RELATIONS.iter().map(|r| r.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A node on a found path.
#[derive(Debug, Clone, Serialize)]
pub struct PathNode {
    pub id: String,
    pub label: String,
}

/// A shortest path between two nodes.
#[derive(Debug, Clone, Serialize)]
pub struct Path {
    /// Edge count.
    pub distance: usize,
    /// Node sequence from start to goal.
    pub nodes: Vec<PathNode>,
}

/// Find a shortest path between `start` and `goal`, treating edges as
/// undirected and traversing only the allowed relations.
///
/// Each frontier level issues one neighbor query per pending node; a
/// visited set prevents re-expansion and back-pointers reconstruct the
/// path once the goal is sighted. Ties between equal-length paths go to
/// the first arrival in FIFO expansion order.
pub fn shortest_path(
    pool: &DbPool,
    start: &str,
    goal: &str,
    options: &PathOptions,
) -> GraphResult<Option<Path>> {
    if start == goal {
        return Ok(Some(Path {
            distance: 0,
            nodes: vec![lookup_node(pool, start)?],
        }));
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut parents: HashMap<String, String> = HashMap::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();

    visited.insert(start.to_string());
    queue.push_back((start.to_string(), 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= options.max_depth {
            continue;
        }

        for neighbor in neighbor_ids(pool, &current, &options.relations)? {
            if !visited.insert(neighbor.clone()) {
                continue;
            }
            parents.insert(neighbor.clone(), current.clone());

            if neighbor == goal {
                return Ok(Some(build_path(pool, start, goal, &parents)?));
            }
            queue.push_back((neighbor, depth + 1));
        }
    }

    Ok(None)
}

/// One store round trip: all neighbors of `node` reachable via an allowed
/// relation, in either direction.
fn neighbor_ids(pool: &DbPool, node: &str, relations: &[String]) -> GraphResult<Vec<String>> {
    let placeholders = vec!["?"; relations.len()].join(", ");
    let sql = format!(
        "SELECT node2_id FROM edges WHERE node1_id = ? AND relation IN ({placeholders})
         UNION
         SELECT node1_id FROM edges WHERE node2_id = ? AND relation IN ({placeholders})
         ORDER BY 1"
    );

    let rows = pool.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let bindings: Vec<&str> = std::iter::once(node)
            .chain(relations.iter().map(String::as_str))
            .chain(std::iter::once(node))
            .chain(relations.iter().map(String::as_str))
            .collect();
        let rows = stmt.query_map(params_from_iter(bindings), |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })?;
    Ok(rows)
}

fn build_path(
    pool: &DbPool,
    start: &str,
    goal: &str,
    parents: &HashMap<String, String>,
) -> GraphResult<Path> {
    let mut ids = vec![goal.to_string()];
    let mut current = goal.to_string();
    while current != start {
        match parents.get(&current) {
            Some(parent) => {
                ids.push(parent.clone());
                current = parent.clone();
            }
            None => break,
        }
    }
    ids.reverse();

    let mut path_nodes = Vec::with_capacity(ids.len());
    for id in ids {
        path_nodes.push(lookup_node(pool, &id)?);
    }
    Ok(Path {
        distance: path_nodes.len() - 1,
        nodes: path_nodes,
    })
}

fn lookup_node(pool: &DbPool, id: &str) -> GraphResult<PathNode> {
    let row = nodes::get_node(pool, id)?;
    Ok(PathNode {
        id: row.id,
        label: row.label,
    })
}
