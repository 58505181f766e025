//! Apply command implementation

use anyhow::{bail, Context, Result};
use sc_migrate::ApplySummary;
use std::path::PathBuf;

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::commands::common::{open_storage, ProjectConfig};

/// Execute the apply command
pub async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let (project, storage) = open_storage(global)?;
    let paths = resolve_paths(args, &project);
    if paths.is_empty() {
        bail!("No SQL paths given and none configured in sql_paths");
    }

    let mut total = ApplySummary::default();
    for path in &paths {
        let summary = storage
            .apply(path)
            .await
            .with_context(|| format!("Failed to apply {}", path.display()))?;
        if global.verbose {
            println!(
                "  {}: {} applied, {} unchanged",
                path.display(),
                summary.applied,
                summary.unchanged
            );
        }
        total.applied += summary.applied;
        total.unchanged += summary.unchanged;
    }

    println!(
        "Applied {} file{}, {} unchanged",
        total.applied,
        if total.applied == 1 { "" } else { "s" },
        total.unchanged
    );
    Ok(())
}

/// Paths from the command line as given, else `sql_paths` from config
/// resolved against the project directory.
fn resolve_paths(args: &ApplyArgs, project: &ProjectConfig) -> Vec<PathBuf> {
    if args.paths.is_empty() {
        project.config.sql_paths_absolute(&project.root)
    } else {
        args.paths.iter().map(PathBuf::from).collect()
    }
}
