//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Scrooge - versioned schema migrations and hash-gated SQL for the ledger database
#[derive(Parser, Debug)]
#[command(name = "scrooge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (DuckDB file or :memory:)
    #[arg(short, long, global = true, env = "SCROOGE_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create tracking tables and apply pending migrations
    Migrate,

    /// Apply SQL files whose content changed since the last apply
    Apply(ApplyArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),

    /// Print the content digest of SQL files
    Digest(DigestArgs),
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Files or directories to apply (default: sql_paths from config)
    pub paths: Vec<String>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the digest command
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// Files to digest
    #[arg(required = true)]
    pub files: Vec<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
