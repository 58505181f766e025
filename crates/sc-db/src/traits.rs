//! Database trait definition

use crate::error::DbResult;
use crate::value::{Row, SqlValue, Statement};
use async_trait::async_trait;

/// SQL executor consumed by the migration engine.
///
/// Implementations must be Send + Sync so one handle can be shared as
/// `Arc<dyn Database>` by every component that needs it.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single statement with positional `?` parameters, returns affected rows
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Execute one or more `;`-separated statements without parameters
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and collect every row
    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>>;

    /// Execute `statements` in order inside one transaction.
    ///
    /// Either every statement commits or, on the first failure, the
    /// transaction is rolled back and that failure is returned.
    async fn execute_in_transaction(&self, statements: &[Statement]) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Create a schema if it does not exist
    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
