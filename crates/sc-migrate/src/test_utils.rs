//! Shared test helpers: migration trees on disk and a recording executor.

use async_trait::async_trait;
use sc_db::{Database, DbError, DbResult, DuckDbBackend, Row, SqlValue, Statement};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Write `<root>/<dir_name>/up.sql`.
pub(crate) fn write_migration(root: &Path, dir_name: &str, sql: &str) {
    let dir = root.join(dir_name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("up.sql"), sql).unwrap();
}

/// Write `sql` to `path`, creating parent directories.
pub(crate) fn write_sql(path: &Path, sql: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, sql).unwrap();
}

/// In-memory DuckDB that records every statement it is handed.
///
/// `fail_on(needle)` makes any statement containing `needle` fail before
/// reaching DuckDB. Inside `execute_in_transaction` a matching statement
/// fails the whole call without executing anything, which is what a
/// rollback leaves behind.
pub(crate) struct RecordingDatabase {
    inner: DuckDbBackend,
    statements: Mutex<Vec<String>>,
    fail_on: Mutex<Option<String>>,
}

impl RecordingDatabase {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: DuckDbBackend::in_memory().unwrap(),
            statements: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
        })
    }

    pub(crate) fn fail_on(&self, needle: &str) {
        *self.fail_on.lock().unwrap() = Some(needle.to_string());
    }

    pub(crate) fn clear_failure(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    /// Statements seen so far, in order.
    pub(crate) fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    /// Forget recorded statements.
    pub(crate) fn reset(&self) {
        self.statements.lock().unwrap().clear();
    }

    /// Number of recorded statements containing `needle`.
    pub(crate) fn count_matching(&self, needle: &str) -> usize {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .filter(|sql| sql.contains(needle))
            .count()
    }

    fn record(&self, sql: &str) -> DbResult<()> {
        self.statements.lock().unwrap().push(sql.to_string());
        match self.fail_on.lock().unwrap().as_deref() {
            Some(needle) if sql.contains(needle) => Err(DbError::ExecutionError(format!(
                "injected failure on '{needle}'"
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Database for RecordingDatabase {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.record(sql)?;
        self.inner.execute(sql, params).await
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.record(sql)?;
        self.inner.execute_batch(sql).await
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        self.record(sql)?;
        self.inner.query(sql, params).await
    }

    async fn execute_in_transaction(&self, statements: &[Statement]) -> DbResult<()> {
        for statement in statements {
            self.record(statement.sql())?;
        }
        self.inner.execute_in_transaction(statements).await
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.inner.relation_exists(name).await
    }

    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()> {
        self.inner.create_schema_if_not_exists(schema).await
    }

    fn db_type(&self) -> &'static str {
        "recording"
    }
}
