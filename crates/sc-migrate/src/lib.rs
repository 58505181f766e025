//! Schema migration engine for Scrooge.
//!
//! Two mechanisms share one executor:
//! - versioned migrations discovered from `<root>/<version>_<name>/up.sql`,
//!   tracked in a ledger table and applied in version order
//!   ([`runner::MigrationRunner`]);
//! - ad-hoc SQL files re-applied only when their content digest changes
//!   ([`applier::SqlApplier`]).
//!
//! [`Storage`] wires both together and exposes the startup entry point,
//! [`Storage::setup`].

pub mod applier;
pub mod catalog;
pub mod error;
pub mod ledger;
pub mod runner;
pub mod settings;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

pub use applier::{ApplyOutcome, ApplySummary, SqlApplier};
pub use catalog::Migration;
pub use error::{MigrateError, MigrateResult};
pub use ledger::{AppliedVersion, Ledger};
pub use runner::{MigrationRunner, MigrationState, MigrationStatus};
pub use settings::SettingsStore;
pub use storage::{Storage, StorageOptions};
