//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// mg - apply versioned SQL migrations in order, exactly once
#[derive(Parser, Debug)]
#[command(name = "mg")]
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
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override database path (DuckDB file or :memory:)
    #[arg(short, long, global = true, env = "MG_DATABASE")]
    pub database: Option<String>,

    /// Override migrations directory
    #[arg(short, long, global = true)]
    pub migrations_dir: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending migrations
    Migrate(MigrateArgs),

    /// Show applied, pending and missing migrations
    Status(StatusArgs),

    /// Create the next migration script
    New(NewArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Override the ledger table name
    #[arg(long)]
    pub table: Option<String>,

    /// Do not treat ';' inside quotes or comments as a statement separator
    #[arg(long)]
    pub quote_aware: bool,

    /// Output format for the run summary
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: MigrateOutput,
}

/// Migrate output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateOutput {
    /// One-line summary
    Text,
    /// JSON run report (progress lines go to stderr)
    Json,
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

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Migration name, e.g. create-users (no '_' or '.')
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
