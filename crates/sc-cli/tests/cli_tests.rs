//! End-to-end tests for the `scrooge` binary.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Path to the compiled scrooge binary
fn scrooge_bin() -> String {
    env!("CARGO_BIN_EXE_scrooge").to_string()
}

/// Run `scrooge` in `project` and return (stdout, stderr, success).
fn run_scrooge(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(scrooge_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("SCROOGE_DATABASE")
        .env_remove("SCROOGE_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute scrooge with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_project(root: &Path) {
    write(
        &root.join("scrooge.yml"),
        "database:\n  path: bank.duckdb\nsql_paths: [sql]\nbase_dir: .\n",
    );
    write(
        &root.join("migrations/001_accounts/up.sql"),
        "CREATE TABLE accounts (id INT PRIMARY KEY, balance BIGINT);",
    );
    write(
        &root.join("migrations/002_loans/up.sql"),
        "CREATE TABLE loans (id INT, account_id INT, amount BIGINT);",
    );
    write(
        &root.join("sql/views/exposure.sql"),
        "CREATE OR REPLACE VIEW exposure AS SELECT account_id, SUM(amount) AS total FROM loans GROUP BY account_id;",
    );
}

#[test]
fn test_migrate_then_rerun() {
    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());

    let (stdout, stderr, ok) = run_scrooge(dir.path(), &["migrate"]);
    assert!(ok, "migrate failed: {stderr}");
    assert!(stdout.contains("Applied 2 migrations"), "stdout: {stdout}");
    assert!(dir.path().join("bank.duckdb").exists());

    let (stdout, _, ok) = run_scrooge(dir.path(), &["migrate"]);
    assert!(ok);
    assert!(stdout.contains("Applied 0 migrations"), "stdout: {stdout}");
}

#[test]
fn test_apply_uses_configured_paths() {
    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());
    assert!(run_scrooge(dir.path(), &["migrate"]).2);

    let (stdout, stderr, ok) = run_scrooge(dir.path(), &["apply"]);
    assert!(ok, "apply failed: {stderr}");
    assert!(stdout.contains("Applied 1 file, 0 unchanged"), "stdout: {stdout}");

    let (stdout, _, ok) = run_scrooge(dir.path(), &["apply"]);
    assert!(ok);
    assert!(stdout.contains("Applied 0 files, 1 unchanged"), "stdout: {stdout}");
}

#[test]
fn test_status_json_reports_states() {
    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());

    let (stdout, stderr, ok) = run_scrooge(dir.path(), &["status", "--output", "json"]);
    assert!(ok, "status failed: {stderr}");
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let states: Vec<&str> = plan
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["state"].as_str().unwrap())
        .collect();
    assert_eq!(states, vec!["pending", "pending"]);

    assert!(run_scrooge(dir.path(), &["migrate"]).2);
    let (stdout, _, _) = run_scrooge(dir.path(), &["status", "-o", "json"]);
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(plan[0]["version"], "001");
    assert_eq!(plan[1]["state"], "applied");
}

#[test]
fn test_failed_migration_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());
    write(
        &dir.path().join("migrations/003_broken/up.sql"),
        "ALTER TABLE no_such_table ADD COLUMN x INT;",
    );

    let (_, stderr, ok) = run_scrooge(dir.path(), &["migrate"]);
    assert!(!ok);
    assert!(stderr.contains("[M002]"), "stderr: {stderr}");
    assert!(stderr.contains("003"), "stderr: {stderr}");
}

#[test]
fn test_digest_prints_base64() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("empty.sql");
    write(&file, "");

    let (stdout, _, ok) = run_scrooge(dir.path(), &["digest", file.to_str().unwrap()]);
    assert!(ok);
    assert!(
        stdout.starts_with("47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="),
        "stdout: {stdout}"
    );
}

#[test]
fn test_database_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    sample_project(dir.path());

    let (_, stderr, ok) = run_scrooge(dir.path(), &["migrate", "--database", ":memory:"]);
    assert!(ok, "migrate failed: {stderr}");
    assert!(!dir.path().join("bank.duckdb").exists());
}
