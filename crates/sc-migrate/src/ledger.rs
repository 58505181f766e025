//! Applied-version ledger.
//!
//! One row per applied migration, keyed by version. Rows are inserted by the
//! runner, in the same transaction as the migration body whenever the
//! migration is transactional, and are never updated or deleted by it.

use crate::error::{MigrateError, MigrateResult};
use sc_core::{MigrationVersion, TableName};
use sc_db::{Database, DbResult, SqlValue, Statement};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedVersion {
    pub version: MigrationVersion,
    /// Set only by operators flagging a version for manual repair
    pub dirty: bool,
}

/// Ledger backed by a single table.
pub struct Ledger {
    db: Arc<dyn Database>,
    table: TableName,
}

impl Ledger {
    pub fn new(db: Arc<dyn Database>, table: TableName) -> Self {
        Self { db, table }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Create the ledger table (and its schema) if absent.
    pub async fn ensure_table(&self) -> MigrateResult<()> {
        if let Some(schema) = self.table.schema() {
            self.db
                .create_schema_if_not_exists(schema)
                .await
                .map_err(|source| MigrateError::Ledger {
                    message: format!("failed to create schema {schema}"),
                    source,
                })?;
        }

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 version    VARCHAR NOT NULL PRIMARY KEY,
                 dirty      BOOLEAN NOT NULL,
                 applied_at TIMESTAMPTZ NOT NULL DEFAULT current_timestamp
             )",
            self.table
        );
        self.db
            .execute_batch(&ddl)
            .await
            .map_err(|source| MigrateError::Ledger {
                message: format!("failed to create ledger table {}", self.table),
                source,
            })
    }

    /// Every ledger row, ordered by version.
    ///
    /// A missing ledger table reads as empty.
    pub async fn records(&self) -> MigrateResult<Vec<AppliedVersion>> {
        let exists = self
            .db
            .relation_exists(&self.table)
            .await
            .map_err(|source| self.read_error(source))?;
        if !exists {
            return Ok(Vec::new());
        }

        let rows = self
            .db
            .query(
                &format!("SELECT version, dirty FROM {} ORDER BY version", self.table),
                &[],
            )
            .await
            .map_err(|source| self.read_error(source))?;

        rows.iter()
            .map(|row| -> MigrateResult<AppliedVersion> {
                let version = row
                    .get_str(0)
                    .and_then(|v| MigrationVersion::try_new(v))
                    .ok_or_else(|| self.corrupt(format!("unreadable version {:?}", row.get(0))))?;
                let dirty = row
                    .get_bool(1)
                    .ok_or_else(|| self.corrupt(format!("unreadable dirty flag for {version}")))?;
                Ok(AppliedVersion { version, dirty })
            })
            .collect()
    }

    /// Versions already applied.
    pub async fn applied(&self) -> MigrateResult<BTreeSet<MigrationVersion>> {
        Ok(self
            .records()
            .await?
            .into_iter()
            .map(|record| record.version)
            .collect())
    }

    /// Versions flagged dirty.
    pub async fn dirty(&self) -> MigrateResult<Vec<MigrationVersion>> {
        Ok(self
            .records()
            .await?
            .into_iter()
            .filter(|record| record.dirty)
            .map(|record| record.version)
            .collect())
    }

    /// The insert that marks `version` applied, for use inside a transaction.
    pub fn record_statement(&self, version: &MigrationVersion) -> Statement {
        Statement::single(self.insert_sql(), vec![SqlValue::from(version.as_str())])
    }

    /// Mark `version` applied as a standalone statement.
    pub async fn record(&self, version: &MigrationVersion) -> DbResult<()> {
        self.db
            .execute(&self.insert_sql(), &[SqlValue::from(version.as_str())])
            .await?;
        Ok(())
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (version, dirty) VALUES (?, false)",
            self.table
        )
    }

    fn read_error(&self, source: sc_db::DbError) -> MigrateError {
        MigrateError::Ledger {
            message: format!("failed to read ledger table {}", self.table),
            source,
        }
    }

    fn corrupt(&self, detail: String) -> MigrateError {
        MigrateError::CorruptLedger {
            table: self.table.to_string(),
            detail,
        }
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
