//! sc-db - Database abstraction layer for Scrooge
//!
//! This crate provides the `Database` trait consumed by the migration
//! engine, the row and parameter types exchanged across it, and a DuckDB
//! implementation.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod value;

pub use self::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
pub use value::{Row, SqlValue, Statement};
