//! Terminal output formatting.

use colored::Colorize;
use cskg_graph::queries::neighbors::{NeighborRow, TwoHopRow};
use cskg_graph::queries::similarity::SimilarRow;
use cskg_graph::queries::stats::{DegreeRow, PredecessorGroup};
use cskg_graph::traverse::bfs::Path;
use cskg_graph::traverse::sign::DistantNode;

/// Print a neighbor with its aggregated relations.
pub fn print_neighbor(row: &NeighborRow) {
    println!(
        "- {} | {} | {} | {}",
        row.id.cyan(),
        row.label,
        row.relations.yellow(),
        row.relation_labels.dimmed()
    );
}

/// Print a node reached in two hops.
pub fn print_two_hop(row: &TwoHopRow) {
    println!("- {} | {} | {}", row.id.cyan(), row.label, row.relation_label.dimmed());
}

/// Print a node with its degree.
pub fn print_degree(row: &DegreeRow) {
    println!(
        "- {} | {} | degree {}",
        row.id.cyan(),
        row.label,
        row.degree.to_string().bold()
    );
}

/// Print one predecessor label group.
pub fn print_predecessor_group(group: &PredecessorGroup) {
    println!(
        "- {} | {} | {} | {}",
        group.label.cyan(),
        group.ids,
        group.relations.yellow(),
        group.relation_labels.dimmed()
    );
}

/// Print a similar node with how it matched.
pub fn print_similar(row: &SimilarRow) {
    println!(
        "- {} | {} | {} | {}",
        row.id.cyan(),
        row.label,
        row.similarity_types.magenta(),
        row.relations.yellow()
    );
}

/// Print a shortest-path result, or the absence of one.
pub fn print_path(path: Option<&Path>) {
    let Some(path) = path else {
        println!("{}", "No path found between the nodes.".yellow());
        return;
    };

    println!(
        "{} {}",
        "Shortest path distance:".bold(),
        path.distance.to_string().cyan()
    );
    println!("{}", "Path nodes:".bold());
    for node in &path.nodes {
        println!("- {} ({})", node.id.cyan(), node.label);
    }
}

/// Print a distant synonym/antonym with its representative path.
pub fn print_distant(node: &DistantNode) {
    println!(
        "- {} | {} | {}",
        node.id.cyan(),
        node.label,
        node.path.join(" -> ").dimmed()
    );
}
