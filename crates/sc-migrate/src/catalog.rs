//! Migration discovery.
//!
//! A migrations root holds one directory per migration. The directory name
//! starts with the version token (`001_create_accounts` has version `001`)
//! and the directory contains the body in `up.sql`. Discovery happens fresh
//! on every run and never touches the database.

use crate::error::{read_failed, MigrateError, MigrateResult};
use sc_core::{compute_checksum, MigrationVersion};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File holding a migration body
pub const UP_FILE: &str = "up.sql";

/// Leading line that keeps a migration out of a transaction
pub const DISABLE_TRANSACTION_MARKER: &str = "-- @disable-transaction";

/// A discovered migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub version: MigrationVersion,
    /// Directory name the migration was read from
    pub name: String,
    pub sql: String,
}

impl Migration {
    /// False when the body opts out of transaction wrapping.
    pub fn is_transactional(&self) -> bool {
        !self.sql.starts_with(DISABLE_TRANSACTION_MARKER)
    }

    /// Hex checksum of the body, for display
    pub fn checksum(&self) -> String {
        compute_checksum(&self.sql)
    }
}

/// Discover every migration under `root`, ascending by version.
///
/// Plain files at the root and directories without a version token are
/// skipped. A version claimed by two directories is an error, raised before
/// any body is read.
pub fn discover(root: &Path) -> MigrateResult<Vec<Migration>> {
    let mut dir_names = Vec::new();
    for entry in fs::read_dir(root).map_err(read_failed(root))? {
        let entry = entry.map_err(read_failed(root))?;
        let path = entry.path();
        if !path.is_dir() {
            log::debug!("Skipping non-directory {}", path.display());
            continue;
        }
        dir_names.push(entry.file_name().to_string_lossy().into_owned());
    }
    // Listing order is platform-dependent; sort so duplicate reports are stable.
    dir_names.sort();

    let mut found: BTreeMap<MigrationVersion, String> = BTreeMap::new();
    for name in dir_names {
        let Some(version) = MigrationVersion::from_dir_name(&name) else {
            log::warn!("Skipping migration directory without a version: {name}");
            continue;
        };
        if let Some(first) = found.get(&version) {
            return Err(MigrateError::DuplicateVersion {
                version,
                first: first.clone(),
                second: name,
            });
        }
        found.insert(version, name);
    }

    found
        .into_iter()
        .map(|(version, name)| {
            let up = root.join(&name).join(UP_FILE);
            let sql = fs::read_to_string(&up).map_err(read_failed(&up))?;
            Ok(Migration { version, name, sql })
        })
        .collect()
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
