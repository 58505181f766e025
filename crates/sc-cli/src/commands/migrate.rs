//! Migrate command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::open_storage;

/// Execute the migrate command: the startup sequence, once.
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let (_project, storage) = open_storage(global)?;
    let applied = storage.setup().await.context("Migration failed")?;

    println!(
        "Applied {} migration{}",
        applied,
        if applied == 1 { "" } else { "s" }
    );
    Ok(())
}
