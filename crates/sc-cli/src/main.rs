//! Scrooge CLI - schema migrations and drift detection for the Scrooge ledger

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod logging;

use cli::Cli;
use commands::{apply, digest, migrate, status};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init(cli.global.verbose)?;

    match &cli.command {
        cli::Commands::Migrate => migrate::execute(&cli.global).await,
        cli::Commands::Apply(args) => apply::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Digest(args) => digest::execute(args),
    }
}
