use super::*;
use crate::test_utils::write_migration;

#[test]
fn test_discover_orders_lexically() {
    let dir = tempfile::tempdir().unwrap();
    // Created out of order on purpose
    write_migration(dir.path(), "010_c", "CREATE TABLE c (id INT);");
    write_migration(dir.path(), "001_a", "CREATE TABLE a (id INT);");
    write_migration(dir.path(), "002_b", "CREATE TABLE b (id INT);");

    let migrations = discover(dir.path()).unwrap();
    let versions: Vec<&str> = migrations.iter().map(|m| m.version.as_str()).collect();
    assert_eq!(versions, vec!["001", "002", "010"]);
    assert_eq!(migrations[0].name, "001_a");
    assert_eq!(migrations[0].sql, "CREATE TABLE a (id INT);");
}

#[test]
fn test_discover_does_not_sort_numerically() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "9_nine", "SELECT 9;");
    write_migration(dir.path(), "10_ten", "SELECT 10;");

    let migrations = discover(dir.path()).unwrap();
    let versions: Vec<&str> = migrations.iter().map(|m| m.version.as_str()).collect();
    assert_eq!(versions, vec!["10", "9"]);
}

#[test]
fn test_discover_rejects_duplicate_versions() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "005_accounts", "SELECT 1;");
    write_migration(dir.path(), "005_loans", "SELECT 2;");

    let err = discover(dir.path()).unwrap_err();
    match err {
        MigrateError::DuplicateVersion {
            version,
            first,
            second,
        } => {
            assert_eq!(version, "005");
            assert_eq!(first, "005_accounts");
            assert_eq!(second, "005_loans");
        }
        other => panic!("expected DuplicateVersion, got {other:?}"),
    }
}

#[test]
fn test_duplicate_detected_before_bodies_are_read() {
    let dir = tempfile::tempdir().unwrap();
    // Neither directory has an up.sql; the duplicate still wins
    fs::create_dir(dir.path().join("005_a")).unwrap();
    fs::create_dir(dir.path().join("005_b")).unwrap();

    let err = discover(dir.path()).unwrap_err();
    assert!(matches!(err, MigrateError::DuplicateVersion { .. }));
}

#[test]
fn test_discover_skips_files_and_unversioned_dirs() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "001_a", "SELECT 1;");
    fs::write(dir.path().join("README.md"), "notes").unwrap();
    fs::create_dir(dir.path().join("_drafts")).unwrap();

    let migrations = discover(dir.path()).unwrap();
    assert_eq!(migrations.len(), 1);
}

#[test]
fn test_discover_missing_up_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("001_empty")).unwrap();

    let err = discover(dir.path()).unwrap_err();
    match err {
        MigrateError::ReadFailed { path, .. } => assert!(path.ends_with("up.sql")),
        other => panic!("expected ReadFailed, got {other:?}"),
    }
}

#[test]
fn test_discover_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let err = discover(&dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, MigrateError::ReadFailed { .. }));
}

#[test]
fn test_discover_empty_root() {
    let dir = tempfile::tempdir().unwrap();
    assert!(discover(dir.path()).unwrap().is_empty());
}

#[test]
fn test_transaction_marker() {
    let migration = Migration {
        version: MigrationVersion::new("003"),
        name: "003_index".to_string(),
        sql: "-- @disable-transaction\nCREATE INDEX idx ON accounts (owner);".to_string(),
    };
    assert!(!migration.is_transactional());

    let indented = Migration {
        sql: "  -- @disable-transaction\nSELECT 1;".to_string(),
        ..migration.clone()
    };
    // The marker only counts at the very start of the body
    assert!(indented.is_transactional());
}
