//! Storage façade: the startup entry point and ad-hoc apply over one executor.

use crate::applier::{ApplySummary, SqlApplier};
use crate::error::{read_failed, MigrateResult};
use crate::ledger::Ledger;
use crate::runner::{MigrationRunner, MigrationStatus};
use crate::settings::SettingsStore;
use sc_core::{calc_digest, Config, SettingName, TableName};
use sc_db::Database;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where migrations live and which tables track state.
#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub migrations_dir: PathBuf,
    pub ledger_table: TableName,
    pub settings_table: TableName,
    /// Anchor for ad-hoc setting names
    pub base_dir: PathBuf,
}

impl StorageOptions {
    /// Options from a loaded config, with relative paths resolved against
    /// `root`. Without `base_dir` in the config, setting names are derived
    /// relative to the working directory.
    pub fn from_config(config: &Config, root: &Path) -> MigrateResult<Self> {
        let base_dir = match config.base_dir_absolute(root) {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(read_failed(Path::new(".")))?,
        };
        Ok(Self {
            migrations_dir: config.migrations_dir_absolute(root),
            ledger_table: config.migrations.table.clone(),
            settings_table: config.settings.table.clone(),
            base_dir,
        })
    }
}

/// Migration runner and ad-hoc applier sharing one database.
pub struct Storage {
    db: Arc<dyn Database>,
    options: StorageOptions,
    runner: MigrationRunner,
    applier: SqlApplier,
}

impl Storage {
    pub fn new(db: Arc<dyn Database>, options: StorageOptions) -> Self {
        let ledger = Ledger::new(db.clone(), options.ledger_table.clone());
        let runner = MigrationRunner::new(db.clone(), ledger);
        let settings = SettingsStore::new(db.clone(), options.settings_table.clone());
        let applier = SqlApplier::new(db.clone(), settings, options.base_dir.clone());
        Self {
            db,
            options,
            runner,
            applier,
        }
    }

    pub fn from_config(db: Arc<dyn Database>, config: &Config, root: &Path) -> MigrateResult<Self> {
        Ok(Self::new(db, StorageOptions::from_config(config, root)?))
    }

    pub fn database(&self) -> &Arc<dyn Database> {
        &self.db
    }

    pub fn options(&self) -> &StorageOptions {
        &self.options
    }

    /// Startup entry point.
    ///
    /// Creates the ledger and settings tables when absent, then applies
    /// every pending migration. Returns the number of migrations applied;
    /// any error should abort startup.
    pub async fn setup(&self) -> MigrateResult<usize> {
        self.runner.ledger().ensure_table().await?;
        self.applier.settings().ensure_table().await?;
        self.runner.run(&self.options.migrations_dir).await
    }

    /// Apply an ad-hoc SQL file or directory.
    pub async fn apply(&self, path: &Path) -> MigrateResult<ApplySummary> {
        self.applier.settings().ensure_table().await?;
        self.applier.apply(path).await
    }

    pub async fn get_setting(&self, name: &SettingName) -> MigrateResult<Option<String>> {
        self.applier.settings().get(name).await
    }

    pub async fn set_setting(&self, name: &SettingName, hash: &str) -> MigrateResult<()> {
        self.applier.settings().set(name, hash).await
    }

    /// Digest of `parts`, as stored for ad-hoc files.
    pub fn calc_digest<I, T>(&self, parts: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        calc_digest(parts)
    }

    /// Every known version and where it stands; executes nothing.
    pub async fn status(&self) -> MigrateResult<Vec<MigrationStatus>> {
        self.runner.plan(&self.options.migrations_dir).await
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
