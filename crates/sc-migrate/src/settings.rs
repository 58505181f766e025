//! Name → digest settings table for ad-hoc SQL files.

use crate::error::{MigrateError, MigrateResult};
use sc_core::{SettingName, TableName};
use sc_db::{Database, SqlValue};
use std::sync::Arc;

/// Settings table holding one digest per setting name.
pub struct SettingsStore {
    db: Arc<dyn Database>,
    table: TableName,
}

impl SettingsStore {
    pub fn new(db: Arc<dyn Database>, table: TableName) -> Self {
        Self { db, table }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Create the settings table (and its schema) if absent.
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
                 name VARCHAR NOT NULL PRIMARY KEY,
                 hash VARCHAR NOT NULL
             )",
            self.table
        );
        self.db
            .execute_batch(&ddl)
            .await
            .map_err(|source| MigrateError::Ledger {
                message: format!("failed to create settings table {}", self.table),
                source,
            })
    }

    /// Stored digest for `name`, if any.
    pub async fn get(&self, name: &SettingName) -> MigrateResult<Option<String>> {
        let rows = self
            .db
            .query(
                &format!("SELECT hash FROM {} WHERE name = ?", self.table),
                &[SqlValue::from(name.as_str())],
            )
            .await
            .map_err(|source| MigrateError::SettingLookupFailed {
                name: name.clone(),
                source,
            })?;

        Ok(rows
            .first()
            .and_then(|row| row.get_str(0))
            .map(str::to_string))
    }

    /// Insert or replace the digest for `name`.
    pub async fn set(&self, name: &SettingName, hash: &str) -> MigrateResult<()> {
        let sql = format!(
            "INSERT INTO {} (name, hash) VALUES (?, ?) \
             ON CONFLICT (name) DO UPDATE SET hash = excluded.hash",
            self.table
        );
        self.db
            .execute(&sql, &[SqlValue::from(name.as_str()), SqlValue::from(hash)])
            .await
            .map_err(|source| MigrateError::SettingWriteFailed {
                name: name.clone(),
                source,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingDatabase;
    use sc_db::DuckDbBackend;

    fn store() -> (Arc<dyn Database>, SettingsStore) {
        let db: Arc<dyn Database> = Arc::new(DuckDbBackend::in_memory().unwrap());
        let store = SettingsStore::new(db.clone(), TableName::new("migration_hashes.hashes"));
        (db, store)
    }

    #[tokio::test]
    async fn test_get_missing_setting() {
        let (_db, store) = store();
        store.ensure_table().await.unwrap();
        let value = store.get(&SettingName::new("sql/views")).await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (_db, store) = store();
        store.ensure_table().await.unwrap();
        let name = SettingName::new("sql/views/balances");
        store.set(&name, "abc=").await.unwrap();
        assert_eq!(store.get(&name).await.unwrap().as_deref(), Some("abc="));
    }

    #[tokio::test]
    async fn test_set_upserts_single_row() {
        let (db, store) = store();
        store.ensure_table().await.unwrap();
        let name = SettingName::new("sql/functions/interest");
        store.set(&name, "first").await.unwrap();
        store.set(&name, "second").await.unwrap();

        assert_eq!(store.get(&name).await.unwrap().as_deref(), Some("second"));
        let rows = db
            .query("SELECT COUNT(*) FROM migration_hashes.hashes", &[])
            .await
            .unwrap();
        assert_eq!(rows[0].get_i64(0), Some(1));
    }

    #[tokio::test]
    async fn test_lookup_failure_names_setting() {
        let recorder = RecordingDatabase::new();
        let store = SettingsStore::new(recorder.clone(), TableName::new("hashes"));
        store.ensure_table().await.unwrap();
        recorder.fail_on("SELECT hash");

        let err = store.get(&SettingName::new("sql/a")).await.unwrap_err();
        match err {
            MigrateError::SettingLookupFailed { name, .. } => assert_eq!(name, "sql/a"),
            other => panic!("expected SettingLookupFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_failure_names_setting() {
        let recorder = RecordingDatabase::new();
        let store = SettingsStore::new(recorder.clone(), TableName::new("hashes"));
        store.ensure_table().await.unwrap();
        recorder.fail_on("INSERT INTO hashes");

        let err = store.set(&SettingName::new("sql/b"), "h").await.unwrap_err();
        assert!(
            matches!(err, MigrateError::SettingWriteFailed { ref name, .. } if name == "sql/b"),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_missing_table_is_lookup_failure() {
        let (_db, store) = store();
        let err = store.get(&SettingName::new("sql/a")).await.unwrap_err();
        assert!(matches!(err, MigrateError::SettingLookupFailed { .. }));
    }
}
