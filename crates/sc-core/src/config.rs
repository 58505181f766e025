//! Configuration types and parsing for scrooge.yml

use crate::error::{CoreError, CoreResult};
use crate::table_name::TableName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in the project directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["scrooge.yml", "scrooge.yaml"];

/// Main configuration from scrooge.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Versioned migration settings
    #[serde(default)]
    pub migrations: MigrationsConfig,

    /// Ad-hoc SQL settings table
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Files or directories applied by `scrooge apply` when no path is given
    #[serde(default)]
    pub sql_paths: Vec<String>,

    /// Directory that ad-hoc setting names are derived relative to.
    ///
    /// Defaults to the process working directory.
    #[serde(default)]
    pub base_dir: Option<String>,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Versioned migration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationsConfig {
    /// Root directory holding one subdirectory per migration
    #[serde(default = "default_migrations_dir")]
    pub dir: String,

    /// Ledger table recording applied versions
    #[serde(default = "default_ledger_table")]
    pub table: TableName,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            dir: default_migrations_dir(),
            table: default_ledger_table(),
        }
    }
}

/// Settings table configuration for ad-hoc SQL digests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Table mapping setting names to content digests
    #[serde(default = "default_settings_table")]
    pub table: TableName,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            table: default_settings_table(),
        }
    }
}

/// Default DuckDB file name
pub const DEFAULT_DB_PATH: &str = "scrooge.duckdb";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_ledger_table() -> TableName {
    TableName::new("schema_migrations")
}

fn default_settings_table() -> TableName {
    TableName::new("migration_hashes.hashes")
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for scrooge.yml or scrooge.yaml and falls back to the defaults
    /// when neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        log::debug!(
            "No config file in {}, using defaults",
            dir.display()
        );
        Ok(Self::default())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if self.migrations.dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations.dir cannot be empty".to_string(),
            });
        }

        if self.migrations.table == self.settings.table {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "migrations.table and settings.table must differ (both are '{}')",
                    self.settings.table
                ),
            });
        }

        Ok(())
    }

    /// Resolve the database path, with an optional override.
    ///
    /// Priority: override (CLI flag / SCROOGE_DATABASE) > config. Relative
    /// file paths resolve against `root`; `:memory:` is passed through.
    pub fn database_path(&self, root: &Path, override_path: Option<&str>) -> String {
        let path = override_path.unwrap_or(self.database.path.as_str());
        if path == ":memory:" || Path::new(path).is_absolute() {
            path.to_string()
        } else {
            root.join(path).display().to_string()
        }
    }

    /// Absolute migrations root
    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        absolute_root(root).join(&self.migrations.dir)
    }

    /// Absolute ad-hoc SQL paths
    pub fn sql_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        let root = absolute_root(root);
        self.sql_paths.iter().map(|p| root.join(p)).collect()
    }

    /// Absolute base directory for setting names, if configured
    pub fn base_dir_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.base_dir
            .as_ref()
            .map(|dir| absolute_root(root).join(dir))
    }
}

/// `root` anchored at the working directory when relative.
///
/// Only an empty path or an unreadable working directory makes
/// `std::path::absolute` fail; the path is then used as given.
fn absolute_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
