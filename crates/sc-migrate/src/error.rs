//! Error types for the migration engine.

use sc_core::{MigrationVersion, SettingName};
use sc_db::DbError;
use thiserror::Error;

/// Migration and ad-hoc apply errors.
///
/// Every variant is fatal to the startup sequence that raised it.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Two migration directories share a version (M001).
    #[error("[M001] Duplicate migration version '{version}' in '{first}' and '{second}'")]
    DuplicateVersion {
        version: MigrationVersion,
        first: String,
        second: String,
    },

    /// A migration body or its ledger insert failed (M002).
    #[error("[M002] Failed to apply migration {version}: {source}")]
    MigrationExecutionFailed {
        version: MigrationVersion,
        source: DbError,
    },

    /// An ad-hoc SQL file failed to execute (M003).
    #[error("[M003] Failed to exec sql {path}: {source}")]
    AdHocApplyFailed { path: String, source: DbError },

    /// Reading a stored digest failed (M004).
    #[error("[M004] Unable to get setting {name}: {source}")]
    SettingLookupFailed { name: SettingName, source: DbError },

    /// Writing a digest failed (M005).
    #[error("[M005] Unable to set setting {name}: {source}")]
    SettingWriteFailed { name: SettingName, source: DbError },

    /// A migration or SQL file could not be read (M006).
    #[error("[M006] Failed to read '{path}': {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    /// Creating or reading the ledger or settings table failed (M007).
    #[error("[M007] {message}: {source}")]
    Ledger { message: String, source: DbError },

    /// The ledger holds a row the engine cannot interpret (M008).
    #[error("[M008] Corrupt ledger row in {table}: {detail}")]
    CorruptLedger { table: String, detail: String },

    /// A version is flagged dirty and needs manual intervention (M009).
    #[error("[M009] Migration {version} is marked dirty; repair the schema and clear the flag before migrating")]
    DirtyVersion { version: MigrationVersion },

    /// No setting name can be derived for a path (M010).
    #[error("[M010] Cannot derive a setting name for '{path}'")]
    InvalidSettingName { path: String },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Build a `map_err` closure that wraps an IO error with its path.
pub(crate) fn read_failed(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> MigrateError + '_ {
    move |source| MigrateError::ReadFailed {
        path: path.display().to_string(),
        source,
    }
}
