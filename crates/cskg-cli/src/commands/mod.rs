//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use cskg_db::DbPool;
use std::path::PathBuf;

pub mod import;
pub mod query;

/// Commonsense Knowledge Graph - import and query tooling
#[derive(Parser)]
#[command(name = "cskg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = "CSKG_DB", default_value = "cskg.db")]
    pub db: PathBuf,

    /// Print query results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a CSKG TSV dump into the store
    Import(import::ImportArgs),

    /// Run a query operation against the stored graph
    #[command(subcommand)]
    Query(query::QueryCommands),
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        tracing::debug!(db = %self.db.display(), "opening store");
        let pool = DbPool::open(&self.db)?;
        cskg_db::migrations::run_migrations(&pool)?;

        match self.command {
            Commands::Import(args) => import::execute(args, &pool),
            Commands::Query(cmd) => query::execute(cmd, &pool, self.json),
        }
    }
}
