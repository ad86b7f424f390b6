//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use mg_core::Config;
use mg_db::DuckDbBackend;
use mg_migrate::{Migrator, MigratorOptions};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Configuration resolved against the project directory and CLI overrides
#[derive(Debug, Clone)]
pub(crate) struct ProjectSettings {
    pub(crate) config: Config,
    pub(crate) migrations_dir: PathBuf,
    pub(crate) database_path: String,
}

/// Load `migrator.yml` (or the `--config` file) and apply CLI overrides.
///
/// A project without a config file runs on defaults.
pub(crate) fn load_settings(global: &GlobalArgs) -> Result<ProjectSettings> {
    let root = global.project_dir.as_path();
    let config = match &global.config {
        Some(path) => Config::load(path).context("Failed to load configuration file")?,
        None => Config::load_from_dir_or_default(root)
            .context("Failed to load project configuration")?,
    };

    let migrations_dir = match &global.migrations_dir {
        Some(dir) => root.join(dir),
        None => config.migrations_dir_absolute(root),
    };
    let database_path = resolve_database_path(
        root,
        global.database.as_deref().unwrap_or(&config.database.path),
    );

    Ok(ProjectSettings {
        config,
        migrations_dir,
        database_path,
    })
}

/// Resolve a configured database path relative to the project directory.
/// Relative `--database` and `--migrations-dir` overrides resolve the same way.
fn resolve_database_path(root: &Path, path: &str) -> String {
    if path == ":memory:" || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

pub(crate) fn open_database(settings: &ProjectSettings) -> Result<DuckDbBackend> {
    log::debug!("opening database {}", settings.database_path);
    DuckDbBackend::new(&settings.database_path)
        .with_context(|| format!("Failed to connect to database {}", settings.database_path))
}

/// Build a migrator that prints progress to stdout, or to stderr when
/// stdout is reserved for machine-readable output.
pub(crate) fn migrator<'a>(
    db: &'a DuckDbBackend,
    options: MigratorOptions,
    progress_to_stderr: bool,
) -> Migrator<'a> {
    Migrator::new(db)
        .with_options(options)
        .with_log_fn(move |args| {
            if progress_to_stderr {
                eprintln!("{args}");
            } else {
                println!("{args}");
            }
        })
}

pub(crate) fn options_from_config(config: &Config) -> MigratorOptions {
    MigratorOptions {
        ledger_table: config.ledger_table.clone(),
        split_mode: config.statement_splitting,
    }
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Render a left-aligned table: header row, dashed separator, then rows.
/// Columns are separated by two spaces.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths = column_widths(headers, rows);
    let render = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(render(row.iter().map(String::as_str).collect()));
    }
    lines
}

pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{}", line);
    }
}

/// Print verbose output if enabled
pub(crate) fn verbose(global: &GlobalArgs, msg: &str) {
    if global.verbose {
        eprintln!("[verbose] {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn global(project_dir: &Path) -> GlobalArgs {
        GlobalArgs {
            verbose: false,
            project_dir: project_dir.to_path_buf(),
            config: None,
            database: None,
            migrations_dir: None,
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&global(dir.path())).unwrap();

        assert_eq!(settings.migrations_dir, dir.path().join("migrations"));
        assert_eq!(
            settings.database_path,
            dir.path().join("app.duckdb").display().to_string()
        );
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("migrator.yml"),
            "migrations_dir: sql\ndatabase:\n  path: data/app.duckdb\n",
        )
        .unwrap();

        let mut args = global(dir.path());
        let settings = load_settings(&args).unwrap();
        assert_eq!(settings.migrations_dir, dir.path().join("sql"));
        assert!(settings.database_path.ends_with("app.duckdb"));

        args.database = Some(":memory:".to_string());
        args.migrations_dir = Some(PathBuf::from("/elsewhere"));
        let settings = load_settings(&args).unwrap();
        assert_eq!(settings.database_path, ":memory:");
        assert_eq!(settings.migrations_dir, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_relative_overrides_resolve_against_project_dir() {
        let dir = tempdir().unwrap();
        let mut args = global(dir.path());
        args.database = Some("state/app.duckdb".to_string());
        args.migrations_dir = Some(PathBuf::from("db/migrations"));

        let settings = load_settings(&args).unwrap();
        assert_eq!(settings.migrations_dir, dir.path().join("db/migrations"));
        assert_eq!(
            settings.database_path,
            dir.path().join("state/app.duckdb").display().to_string()
        );
    }

    #[test]
    fn test_format_table_pads_columns() {
        let lines = format_table(
            &["VERSION", "NAME"],
            &[
                vec!["1".to_string(), "create-users".to_string()],
                vec!["12".to_string(), "seed".to_string()],
            ],
        );
        assert_eq!(
            lines,
            vec![
                "VERSION  NAME",
                "-------  ------------",
                "1        create-users",
                "12       seed",
            ]
        );
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempdir().unwrap();
        let mut args = global(dir.path());
        args.config = Some(dir.path().join("absent.yml"));
        assert!(load_settings(&args).is_err());
    }
}
