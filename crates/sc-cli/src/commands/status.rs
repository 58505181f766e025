//! Status command implementation

use anyhow::{Context, Result};
use sc_migrate::{MigrationState, MigrationStatus};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{open_storage, print_table};

/// Checksum prefix shown in table output
const SHORT_CHECKSUM_LEN: usize = 12;

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let (_project, storage) = open_storage(global)?;
    let plan = storage
        .status()
        .await
        .context("Failed to read migration status")?;

    match args.output {
        StatusOutput::Table => print_status_table(&plan),
        StatusOutput::Json => {
            let json =
                serde_json::to_string_pretty(&plan).context("Failed to serialize to JSON")?;
            println!("{json}");
        }
    }

    let dirty: Vec<&str> = plan
        .iter()
        .filter(|entry| entry.state == MigrationState::Dirty)
        .map(|entry| entry.version.as_str())
        .collect();
    if !dirty.is_empty() {
        log::warn!(
            "Dirty migrations need manual repair before migrating: {}",
            dirty.join(", ")
        );
    }

    Ok(())
}

fn print_status_table(plan: &[MigrationStatus]) {
    if plan.is_empty() {
        println!("No migrations found.");
        return;
    }

    let rows: Vec<Vec<String>> = plan.iter().map(status_row).collect();
    print_table(&["VERSION", "NAME", "STATE", "TXN", "CHECKSUM"], &rows);

    let pending = plan
        .iter()
        .filter(|entry| entry.state == MigrationState::Pending)
        .count();
    println!();
    println!("{} migrations, {} pending", plan.len(), pending);
}

fn status_row(entry: &MigrationStatus) -> Vec<String> {
    let checksum: String = entry
        .checksum
        .as_deref()
        .map(|c| c.chars().take(SHORT_CHECKSUM_LEN).collect())
        .unwrap_or_else(|| "-".to_string());
    vec![
        entry.version.to_string(),
        entry.name.clone(),
        entry.state.to_string(),
        match entry.transactional {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        }
        .to_string(),
        checksum,
    ]
}
