//! Digest command implementation

use anyhow::{Context, Result};
use sc_core::calc_sql_digest;
use std::fs;

use crate::cli::DigestArgs;

/// Print `<digest>  <path>` for each file, the value `apply` stores.
pub fn execute(args: &DigestArgs) -> Result<()> {
    for file in &args.files {
        let sql = fs::read_to_string(file).with_context(|| format!("Failed to read {file}"))?;
        println!("{}  {}", calc_sql_digest(&sql), file);
    }
    Ok(())
}
