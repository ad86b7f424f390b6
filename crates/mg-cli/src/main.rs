//! Migrator CLI - apply versioned SQL migrations to a database

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{migrate, new, status};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::New(args) => new::execute(args, &cli.global),
    }
}
