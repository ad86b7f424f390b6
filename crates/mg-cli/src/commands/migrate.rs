//! Migrate command implementation

use anyhow::{Context, Result};
use mg_core::SplitMode;
use mg_migrate::{MigrationReport, MigratorOptions, RunOutcome};

use crate::cli::{GlobalArgs, MigrateArgs, MigrateOutput};
use crate::commands::common::{self, ProjectSettings};

/// Execute the migrate command
pub fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let settings = common::load_settings(global)?;
    let options = resolve_options(args, &settings);

    common::verbose(
        global,
        &format!(
            "Migrating {} from {} (ledger table: {})",
            settings.database_path,
            settings.migrations_dir.display(),
            options.ledger_table
        ),
    );

    let db = common::open_database(&settings)?;
    let json = args.output == MigrateOutput::Json;
    let report = common::migrator(&db, options, json)
        .migrate(&settings.migrations_dir)
        .with_context(|| {
            format!(
                "Migration failed in {}",
                settings.migrations_dir.display()
            )
        })?;

    println!("{}", render(&report, args.output)?);
    Ok(())
}

fn render(report: &MigrationReport, output: MigrateOutput) -> Result<String> {
    match output {
        MigrateOutput::Text => Ok(summary(report)),
        MigrateOutput::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize migration report")
        }
    }
}

/// Config values, overridden by command flags
fn resolve_options(args: &MigrateArgs, settings: &ProjectSettings) -> MigratorOptions {
    let mut options = common::options_from_config(&settings.config);
    if let Some(table) = &args.table {
        options.ledger_table = table.clone();
    }
    if args.quote_aware {
        options.split_mode = SplitMode::QuoteAware;
    }
    options
}

fn summary(report: &MigrationReport) -> String {
    match report.outcome {
        RunOutcome::NoMigrations => "Nothing to migrate".to_string(),
        RunOutcome::UpToDate => format!("Already at version {}", report.current_version()),
        RunOutcome::Applied => format!(
            "Applied {} migration(s): version {} -> {}",
            report.applied.len(),
            report.previous_version,
            report.current_version()
        ),
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
