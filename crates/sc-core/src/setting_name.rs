//! Names under which ad-hoc SQL file digests are stored.

use crate::newtype_string::define_newtype_string;
use std::path::{Component, Path};

define_newtype_string! {
    /// Path-derived key of a row in the settings table.
    ///
    /// Components are joined with `/` regardless of platform.
    pub struct SettingName;
}

impl SettingName {
    /// Build a name from a path relative to some base directory.
    ///
    /// A trailing `.sql` extension is dropped. `..` components are kept so
    /// files outside the base still get distinct names. Returns `None` for
    /// an empty path.
    pub fn from_relative_path(relative: &Path) -> Option<Self> {
        let stripped = match relative.extension() {
            Some(ext) if ext == "sql" => relative.with_extension(""),
            _ => relative.to_path_buf(),
        };

        let parts: Vec<String> = stripped
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
            })
            .collect();

        Self::try_new(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_sql_extension() {
        let name = SettingName::from_relative_path(Path::new("sql/views/balances.sql")).unwrap();
        assert_eq!(name, "sql/views/balances");
    }

    #[test]
    fn test_keeps_other_extensions() {
        let name = SettingName::from_relative_path(Path::new("sql/seed.psql")).unwrap();
        assert_eq!(name, "sql/seed.psql");
    }

    #[test]
    fn test_parent_components_are_preserved() {
        let name = SettingName::from_relative_path(Path::new("../shared/fn.sql")).unwrap();
        assert_eq!(name, "../shared/fn");
    }

    #[test]
    fn test_empty_path_has_no_name() {
        assert!(SettingName::from_relative_path(Path::new("")).is_none());
        assert!(SettingName::from_relative_path(Path::new(".")).is_none());
    }
}
