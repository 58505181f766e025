//! Versioned migration runner.
//!
//! Computes `pending = catalog - ledger` and executes it in ascending
//! version order. Transactional migrations run as one transaction together
//! with their ledger insert. Migrations starting with
//! `-- @disable-transaction` run bare and are recorded afterwards, so a
//! failed ledger insert leaves them applied but still pending.

use crate::catalog::{self, Migration};
use crate::error::{MigrateError, MigrateResult};
use crate::ledger::Ledger;
use sc_core::MigrationVersion;
use sc_db::{Database, DbResult, Statement};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Where a version stands relative to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationState {
    Applied,
    Pending,
    /// Recorded but flagged for manual repair
    Dirty,
    /// Recorded in the ledger with no directory on disk
    Missing,
}

impl std::fmt::Display for MigrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationState::Applied => write!(f, "applied"),
            MigrationState::Pending => write!(f, "pending"),
            MigrationState::Dirty => write!(f, "dirty"),
            MigrationState::Missing => write!(f, "missing"),
        }
    }
}

/// One line of a migration plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub version: MigrationVersion,
    /// Directory name, empty for [`MigrationState::Missing`]
    pub name: String,
    /// Unknown for [`MigrationState::Missing`] and orphaned dirty rows
    pub transactional: Option<bool>,
    pub state: MigrationState,
    pub checksum: Option<String>,
}

pub struct MigrationRunner {
    db: Arc<dyn Database>,
    ledger: Ledger,
}

impl MigrationRunner {
    pub fn new(db: Arc<dyn Database>, ledger: Ledger) -> Self {
        Self { db, ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Describe every known version without executing anything.
    pub async fn plan(&self, root: &Path) -> MigrateResult<Vec<MigrationStatus>> {
        let available = catalog::discover(root)?;
        let mut recorded: BTreeMap<MigrationVersion, bool> = self
            .ledger
            .records()
            .await?
            .into_iter()
            .map(|record| (record.version, record.dirty))
            .collect();

        let mut plan: Vec<MigrationStatus> = available
            .iter()
            .map(|migration| {
                let state = match recorded.remove(&migration.version) {
                    Some(true) => MigrationState::Dirty,
                    Some(false) => MigrationState::Applied,
                    None => MigrationState::Pending,
                };
                MigrationStatus {
                    version: migration.version.clone(),
                    name: migration.name.clone(),
                    transactional: Some(migration.is_transactional()),
                    state,
                    checksum: Some(migration.checksum()),
                }
            })
            .collect();

        plan.extend(recorded.into_iter().map(|(version, dirty)| MigrationStatus {
            version,
            name: String::new(),
            transactional: None,
            state: if dirty {
                MigrationState::Dirty
            } else {
                MigrationState::Missing
            },
            checksum: None,
        }));
        plan.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(plan)
    }

    /// Migrations that a run would execute, in order.
    pub async fn pending(&self, root: &Path) -> MigrateResult<Vec<Migration>> {
        let available = catalog::discover(root)?;
        let applied = self.ledger.applied().await?;
        Ok(available
            .into_iter()
            .filter(|migration| !applied.contains(&migration.version))
            .collect())
    }

    /// Apply every pending migration under `root` and return how many ran.
    ///
    /// Discovery (including duplicate detection) finishes before any SQL is
    /// issued. The first failure stops the run; later migrations are not
    /// attempted.
    pub async fn run(&self, root: &Path) -> MigrateResult<usize> {
        let available = catalog::discover(root)?;

        let records = self.ledger.records().await?;
        if let Some(record) = records.iter().find(|record| record.dirty) {
            return Err(MigrateError::DirtyVersion {
                version: record.version.clone(),
            });
        }
        if available.is_empty() {
            return Ok(0);
        }
        let applied: std::collections::BTreeSet<_> =
            records.into_iter().map(|record| record.version).collect();

        log::info!("Migrations: Running");
        let mut completed = 0;
        for migration in available
            .iter()
            .filter(|migration| !applied.contains(&migration.version))
        {
            log::info!("    applying {}", migration.version);
            self.apply(migration)
                .await
                .map_err(|source| MigrateError::MigrationExecutionFailed {
                    version: migration.version.clone(),
                    source,
                })?;
            completed += 1;
        }
        log::info!("Migrations: {completed} Completed");

        Ok(completed)
    }

    async fn apply(&self, migration: &Migration) -> DbResult<()> {
        if migration.is_transactional() {
            self.db
                .execute_in_transaction(&[
                    Statement::batch(migration.sql.as_str()),
                    self.ledger.record_statement(&migration.version),
                ])
                .await
        } else {
            log::debug!(
                "Migration {} opts out of transaction wrapping",
                migration.version
            );
            self.db.execute_batch(&migration.sql).await?;
            self.ledger.record(&migration.version).await
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
