//! Scoped relaxed-integrity mode for bulk loads.

use cskg_db::queries::maintenance;
use cskg_db::{DbPool, DbResult};

/// Guard over the store's bulk-load mode: while it is alive, the two edge
/// indexes are dropped and foreign-key enforcement is off.
///
/// Restoration happens on every exit path. The success path goes through
/// [`restore`](Self::restore), which surfaces errors; if the guard is
/// dropped instead (fatal flush failure, IO error, panic), `Drop` restores
/// as a fallback and logs when that also fails.
pub struct RelaxedIntegrity {
    pool: DbPool,
    restored: bool,
}

impl RelaxedIntegrity {
    /// Enter relaxed-integrity mode.
    pub fn suspend(pool: &DbPool) -> DbResult<Self> {
        tracing::info!("suspending edge indexes and foreign keys for bulk load");
        maintenance::set_foreign_keys(pool, false)?;
        maintenance::drop_edge_indexes(pool)?;
        Ok(Self {
            pool: pool.clone(),
            restored: false,
        })
    }

    fn restore_inner(&mut self) -> DbResult<()> {
        self.restored = true;
        tracing::info!("restoring edge indexes and foreign keys");
        maintenance::create_edge_indexes(&self.pool)?;
        maintenance::set_foreign_keys(&self.pool, true)?;
        Ok(())
    }

    /// Leave relaxed-integrity mode, surfacing restoration failures.
    pub fn restore(mut self) -> DbResult<()> {
        self.restore_inner()
    }
}

impl Drop for RelaxedIntegrity {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.restore_inner() {
            tracing::warn!("failed to restore indexes and constraints: {e}");
        }
    }
}
