//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sc_core::Config;
use sc_db::{Database, DuckDbBackend};
use sc_migrate::Storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// A loaded config together with the directory its relative paths resolve against.
pub(crate) struct ProjectConfig {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

/// Load the config named by `--config`, or the one in the project directory.
///
/// An explicit `--config` must exist; a project directory without a config
/// file uses the defaults.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<ProjectConfig> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load config")?;
    Ok(ProjectConfig { root, config })
}

/// Open the configured database, honoring `--database` / `SCROOGE_DATABASE`.
pub(crate) fn create_database_connection(
    project: &ProjectConfig,
    override_path: Option<&str>,
) -> Result<Arc<dyn Database>> {
    let path = project.config.database_path(&project.root, override_path);
    log::debug!("Opening database {path}");
    let db: Arc<dyn Database> = Arc::new(
        DuckDbBackend::new(&path).with_context(|| format!("Failed to connect to database {path}"))?,
    );
    Ok(db)
}

/// Load config and open a [`Storage`] over the configured database.
pub(crate) fn open_storage(global: &GlobalArgs) -> Result<(ProjectConfig, Storage)> {
    let project = load_config(global)?;
    let db = create_database_connection(&project, global.database.as_deref())?;
    let storage = Storage::from_config(db, &project.config, &project.root)
        .context("Failed to resolve storage options")?;
    Ok((project, storage))
}

/// Widest cell per column, headers included.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print left-aligned columns separated by two spaces, with a dashed rule
/// under the header.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);
    let render = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", render(headers.to_vec()));
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", rule.join("  "));
    for row in rows {
        println!("{}", render(row.iter().map(String::as_str).collect()));
    }
}
