//! Query commands: one subcommand per documented graph operation.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use cskg_db::DbPool;
use cskg_graph::queries::{neighbors, similarity, stats};
use cskg_graph::rename;
use cskg_graph::traverse::{bfs, sign};
use serde::Serialize;
use std::time::Instant;

use crate::output;

#[derive(Subcommand)]
pub enum QueryCommands {
    /// Nodes a given node points to
    Successors { node_id: String },

    /// Number of outgoing edges of a node
    SuccessorCount { node_id: String },

    /// Nodes pointing to a given node
    Predecessors { node_id: String },

    /// Number of incoming edges of a node
    PredecessorCount { node_id: String },

    /// Nodes connected to a given node in either direction
    Neighbors { node_id: String },

    /// Number of distinct neighbors of a node
    NeighborCount { node_id: String },

    /// Successors of successors, excluding the node itself
    TwoHopSuccessors { node_id: String },

    /// Predecessors of predecessors, excluding the node itself
    TwoHopPredecessors { node_id: String },

    /// Total number of nodes
    NodeCount,

    /// Number of nodes with no incoming edges
    SourceCount,

    /// Number of nodes with no outgoing edges
    SinkCount,

    /// Node(s) with the highest degree
    MostConnected,

    /// Predecessors of a node grouped by their label
    PredecessorGroups { node_id: String },

    /// Nodes sharing a parent or child with a node under the same relation
    Similar { node_id: String },

    /// Atomically rename a node everywhere it is referenced
    Rename {
        node_id: String,
        new_id: String,
        new_label: String,
    },

    /// Shortest path between two nodes
    Path {
        node_id: String,
        second_node_id: String,

        /// Relation the search may traverse (repeatable; defaults to the
        /// built-in allow-list)
        #[arg(long = "relation")]
        relations: Vec<String>,

        /// Search depth bound
        #[arg(long, default_value_t = bfs::DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Distant synonyms of a node at an exact distance
    Synonyms {
        node_id: String,

        #[arg(long)]
        distance: u32,
    },

    /// Distant antonyms of a node at an exact distance
    Antonyms {
        node_id: String,

        #[arg(long)]
        distance: u32,
    },
}

pub fn execute(cmd: QueryCommands, pool: &DbPool, json: bool) -> Result<()> {
    let started = Instant::now();

    match cmd {
        QueryCommands::Successors { node_id } => {
            print_rows(&neighbors::successors(pool, &node_id)?, json, output::print_neighbor)?;
        }
        QueryCommands::SuccessorCount { node_id } => {
            print_count(neighbors::successor_count(pool, &node_id)?, json)?;
        }
        QueryCommands::Predecessors { node_id } => {
            print_rows(&neighbors::predecessors(pool, &node_id)?, json, output::print_neighbor)?;
        }
        QueryCommands::PredecessorCount { node_id } => {
            print_count(neighbors::predecessor_count(pool, &node_id)?, json)?;
        }
        QueryCommands::Neighbors { node_id } => {
            print_rows(&neighbors::neighbors(pool, &node_id)?, json, output::print_neighbor)?;
        }
        QueryCommands::NeighborCount { node_id } => {
            print_count(neighbors::neighbor_count(pool, &node_id)?, json)?;
        }
        QueryCommands::TwoHopSuccessors { node_id } => {
            print_rows(&neighbors::two_hop_successors(pool, &node_id)?, json, output::print_two_hop)?;
        }
        QueryCommands::TwoHopPredecessors { node_id } => {
            print_rows(&neighbors::two_hop_predecessors(pool, &node_id)?, json, output::print_two_hop)?;
        }
        QueryCommands::NodeCount => {
            print_count(stats::node_count(pool)?, json)?;
        }
        QueryCommands::SourceCount => {
            print_count(stats::source_count(pool)?, json)?;
        }
        QueryCommands::SinkCount => {
            print_count(stats::sink_count(pool)?, json)?;
        }
        QueryCommands::MostConnected => {
            print_rows(&stats::most_connected(pool)?, json, output::print_degree)?;
        }
        QueryCommands::PredecessorGroups { node_id } => {
            print_rows(&stats::predecessor_groups(pool, &node_id)?, json, output::print_predecessor_group)?;
        }
        QueryCommands::Similar { node_id } => {
            print_rows(&similarity::similar_nodes(pool, &node_id)?, json, output::print_similar)?;
        }
        QueryCommands::Rename { node_id, new_id, new_label } => {
            let outcome = rename::rename_node(pool, &node_id, &new_id, &new_label)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!(
                    "{} {} {} {} {}",
                    "Renamed".green().bold(),
                    node_id.cyan(),
                    "to".bold(),
                    new_id.cyan(),
                    format!("(label '{new_label}')").dimmed()
                );
                println!(
                    "  Edges repointed: {} outgoing, {} incoming",
                    outcome.outgoing_repointed.to_string().cyan(),
                    outcome.incoming_repointed.to_string().cyan()
                );
            }
        }
        QueryCommands::Path { node_id, second_node_id, relations, max_depth } => {
            let mut options = bfs::PathOptions {
                max_depth,
                ..Default::default()
            };
            if !relations.is_empty() {
                options.relations = relations;
            }

            let path = bfs::shortest_path(pool, &node_id, &second_node_id, &options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&path)?);
            } else {
                output::print_path(path.as_ref());
            }
        }
        QueryCommands::Synonyms { node_id, distance } => {
            let rows = sign::distant_relatives(pool, &node_id, distance, sign::Sign::Synonym)?;
            print_rows(&rows, json, output::print_distant)?;
        }
        QueryCommands::Antonyms { node_id, distance } => {
            let rows = sign::distant_relatives(pool, &node_id, distance, sign::Sign::Antonym)?;
            print_rows(&rows, json, output::print_distant)?;
        }
    }

    println!(
        "{}",
        format!("Execution time: {:.4?}", started.elapsed()).dimmed()
    );
    Ok(())
}

fn print_rows<T: Serialize>(rows: &[T], json: bool, print_one: fn(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", "No results found.".dimmed());
        return Ok(());
    }
    for row in rows {
        print_one(row);
    }
    Ok(())
}

fn print_count(count: i64, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "count": count }));
    } else {
        println!("{}: {}", "Count".bold(), count.to_string().cyan());
    }
    Ok(())
}
