//! Import command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use cskg_db::DbPool;
use cskg_import::{count_lines, run_import, ImportOptions, DEFAULT_BATCH_SIZE};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ImportArgs {
    /// Path to the TSV dump
    #[arg(long)]
    pub tsv: PathBuf,

    /// Clear existing graph data before importing
    #[arg(long)]
    pub clean: bool,

    /// Edge-batch size that triggers a flush
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch: usize,
}

pub fn execute(args: ImportArgs, pool: &DbPool) -> Result<()> {
    let total_lines = count_lines(&args.tsv)
        .with_context(|| format!("cannot read input file {}", args.tsv.display()))?;

    println!("{} {}", "Importing from".bold(), args.tsv.display());

    // One header line does not count towards progress.
    let bar = ProgressBar::new(total_lines.saturating_sub(1));
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} ({eta})")
            .expect("valid progress template"),
    );

    let mut options = ImportOptions::new(&args.tsv);
    options.batch_size = args.batch;
    options.clean = args.clean;

    let summary = run_import(pool, &options, || bar.inc(1))?;
    bar.finish_and_clear();

    println!("\n{}", "Import summary:".green().bold());
    println!(
        "  Imported nodes: {}",
        summary.nodes_imported.to_string().cyan()
    );
    println!(
        "  Imported edges: {}",
        summary.edges_imported.to_string().cyan()
    );
    println!(
        "  Skipped lines:  {}",
        summary.lines_skipped.to_string().yellow()
    );
    println!("  Elapsed:        {:.2?}", summary.elapsed);

    Ok(())
}
