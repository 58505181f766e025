//! Version identifiers for directory-based migrations.

use crate::newtype_string::define_newtype_string;

/// Separator between the version token and the descriptive part of a
/// migration directory name (`001_create_accounts`).
pub const VERSION_SEPARATOR: char = '_';

define_newtype_string! {
    /// Opaque, totally-ordered migration version.
    ///
    /// Versions compare lexically, not numerically: `010` sorts after `002`
    /// only because both are zero-padded to the same width.
    pub struct MigrationVersion;
}

impl MigrationVersion {
    /// Derive a version from a migration directory name.
    ///
    /// The version is everything before the first `_`, or the whole name
    /// when there is no separator. Returns `None` when that token is empty.
    pub fn from_dir_name(dir_name: &str) -> Option<Self> {
        let token = dir_name
            .split(VERSION_SEPARATOR)
            .next()
            .unwrap_or_default();
        Self::try_new(token)
    }
}
