//! Batch importer for CSKG TSV dumps.
//!
//! Streams the dump line by line, deduplicates node writes within the run,
//! accumulates per-kind batches, and keeps the store's secondary structures
//! suspended for the duration of the bulk phase.

pub mod guard;
pub mod record;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use cskg_db::queries::{edges, maintenance, nodes};
use cskg_db::{DbPool, DbResult};
use rusqlite::params;
use thiserror::Error;

use guard::RelaxedIntegrity;
use record::parse_record;

/// Default edge-batch flush threshold.
pub const DEFAULT_BATCH_SIZE: usize = 50_000;

/// Importer error types. Anything surfaced here is fatal for the run;
/// malformed records are skipped and counted instead.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Db(#[from] cskg_db::DbError),
}

/// Importer configuration.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Path to the TSV dump.
    pub path: PathBuf,
    /// Edge-batch size that triggers a flush.
    pub batch_size: usize,
    /// Remove all existing graph data before importing.
    pub clean: bool,
}

impl ImportOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            clean: false,
        }
    }
}

/// Outcome of one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub nodes_imported: u64,
    pub edges_imported: u64,
    pub lines_skipped: u64,
    pub elapsed: Duration,
}

/// Count the lines of the input file. The CLI sizes its progress bar with
/// this before the run starts.
pub fn count_lines(path: &Path) -> std::io::Result<u64> {
    let reader = BufReader::new(File::open(path)?);
    let mut total = 0;
    for line in reader.lines() {
        line?;
        total += 1;
    }
    Ok(total)
}

/// Run an import against the store. `progress` is invoked once per data
/// line consumed.
pub fn run_import(
    pool: &DbPool,
    options: &ImportOptions,
    progress: impl FnMut(),
) -> Result<ImportSummary, ImportError> {
    let file = File::open(&options.path)?;
    run_from_reader(pool, options, BufReader::new(file), progress)
}

/// Importer core, generic over the input source so tests can feed readers.
pub fn run_from_reader(
    pool: &DbPool,
    options: &ImportOptions,
    reader: impl BufRead,
    mut progress: impl FnMut(),
) -> Result<ImportSummary, ImportError> {
    let started = Instant::now();

    if options.clean {
        maintenance::truncate_all(pool)?;
    }

    let guard = RelaxedIntegrity::suspend(pool)?;

    let mut summary = ImportSummary::default();
    let mut seen_nodes: HashSet<String> = HashSet::new();
    let mut node_batch: Vec<(String, String)> = Vec::new();
    let mut edge_batch: Vec<(i64, String, String, String, String)> = Vec::new();
    let mut next_edge_id: i64 = 0;

    let mut lines = reader.lines();

    // One header line, skipped.
    if let Some(header) = lines.next() {
        header?;
    }

    for line in lines {
        let line = line?;
        progress();

        let record = match parse_record(&line) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed line");
                summary.lines_skipped += 1;
                continue;
            }
        };

        for (id, label) in [
            (record.node1_id, record.node1_label),
            (record.node2_id, record.node2_label),
        ] {
            // The seen set spans the whole run, so a node is queued at
            // most once regardless of flush cycles.
            if seen_nodes.insert(id.to_string()) {
                node_batch.push((id.to_string(), label.to_string()));
                summary.nodes_imported += 1;
            }
        }

        edge_batch.push((
            next_edge_id,
            record.node1_id.to_string(),
            record.node2_id.to_string(),
            record.relation.to_string(),
            record.relation_label.to_string(),
        ));
        next_edge_id += 1;
        summary.edges_imported += 1;

        if edge_batch.len() >= options.batch_size {
            flush_batches(pool, &mut node_batch, &mut edge_batch)?;
        }
    }

    // Final partial batch.
    flush_batches(pool, &mut node_batch, &mut edge_batch)?;

    guard.restore()?;

    summary.elapsed = started.elapsed();
    tracing::info!(
        nodes = summary.nodes_imported,
        edges = summary.edges_imported,
        skipped = summary.lines_skipped,
        "import finished"
    );
    Ok(summary)
}

/// Flush both batches inside one transaction, nodes first. A failure here
/// is fatal for the run: the transaction rolls back on drop and the error
/// propagates to the caller.
fn flush_batches(
    pool: &DbPool,
    node_batch: &mut Vec<(String, String)>,
    edge_batch: &mut Vec<(i64, String, String, String, String)>,
) -> DbResult<()> {
    if node_batch.is_empty() && edge_batch.is_empty() {
        return Ok(());
    }

    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        {
            let mut upsert = tx.prepare_cached(nodes::UPSERT_NODE_SQL)?;
            for (id, label) in node_batch.iter() {
                upsert.execute(params![id, label])?;
            }

            let mut insert = tx.prepare_cached(edges::INSERT_EDGE_SQL)?;
            for (id, src, dst, relation, relation_label) in edge_batch.iter() {
                insert.execute(params![id, src, dst, relation, relation_label])?;
            }
        }
        tx.commit()?;
        Ok(())
    })?;

    tracing::debug!(
        nodes = node_batch.len(),
        edges = edge_batch.len(),
        "flushed batch"
    );
    node_batch.clear();
    edge_batch.clear();
    Ok(())
}
