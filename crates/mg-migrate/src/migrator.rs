//! Orchestrates a migration run: discovery, ledger, then each pending
//! migration in ascending version order.
//!
//! The pending set is computed once from the last applied version and is not
//! re-read between migrations, so two runners against the same database can
//! race. The loser fails on the ledger's uniqueness constraint.

use crate::error::MigrateResult;
use crate::executor::Executor;
use crate::ledger::{Ledger, LedgerRow};
use crate::logger::{LogCrateLogger, MigrationLogger};
use mg_core::{discover_migrations, MigrationSet, SplitMode, DEFAULT_LEDGER_TABLE};
use mg_db::Database;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Knobs for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorOptions {
    /// Ledger table name, optionally `schema.table`
    pub ledger_table: String,
    /// How scripts are split into statements
    pub split_mode: SplitMode,
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self {
            ledger_table: DEFAULT_LEDGER_TABLE.to_string(),
            split_mode: SplitMode::default(),
        }
    }
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The migrations directory was empty
    NoMigrations,
    /// Nothing above the last applied version
    UpToDate,
    /// At least one migration was applied
    Applied,
}

/// A migration applied during this run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Last applied version before the run (0 if none)
    pub previous_version: i64,
    /// Applied migrations, in the order they ran
    pub applied: Vec<AppliedMigration>,
    pub outcome: RunOutcome,
}

impl MigrationReport {
    fn unchanged(previous_version: i64, outcome: RunOutcome) -> Self {
        Self {
            previous_version,
            applied: Vec::new(),
            outcome,
        }
    }

    /// Last applied version after the run
    pub fn current_version(&self) -> i64 {
        self.applied
            .last()
            .map_or(self.previous_version, |m| m.version)
    }
}

/// State of one migration relative to the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MigrationState {
    Applied { executed_at: String },
    Pending,
    /// Recorded in the ledger but no longer on disk
    Missing { executed_at: String },
}

/// One line of [`Migrator::status`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub version: i64,
    pub name: String,
    #[serde(flatten)]
    pub state: MigrationState,
}

/// Brings a database up to the latest migration in a directory
pub struct Migrator<'a> {
    db: &'a dyn Database,
    options: MigratorOptions,
    logger: Box<dyn MigrationLogger + 'a>,
}

impl<'a> Migrator<'a> {
    /// Create a migrator with default options, logging through the `log` crate
    pub fn new(db: &'a dyn Database) -> Self {
        Self {
            db,
            options: MigratorOptions::default(),
            logger: Box::new(LogCrateLogger),
        }
    }

    pub fn with_options(mut self, options: MigratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.options.ledger_table = table.into();
        self
    }

    pub fn with_split_mode(mut self, split_mode: SplitMode) -> Self {
        self.options.split_mode = split_mode;
        self
    }

    /// Replace the progress logger
    pub fn with_logger(mut self, logger: impl MigrationLogger + 'a) -> Self {
        self.logger = Box::new(logger);
        self
    }

    /// Replace the progress logger with a closure
    pub fn with_log_fn<F>(self, f: F) -> Self
    where
        F: Fn(fmt::Arguments<'_>) + 'a,
    {
        self.with_logger(f)
    }

    /// Apply every migration in `dir` above the last applied version.
    ///
    /// Stops at the first failure; migrations committed before it stay
    /// committed. Discovery happens before the ledger table is touched, so a
    /// malformed directory leaves the database unchanged.
    pub fn migrate(&self, dir: &Path) -> MigrateResult<MigrationReport> {
        let logger = self.logger.as_ref();
        let ledger = Ledger::new(self.db, logger, &self.options.ledger_table)?;
        let migrations = discover_migrations(dir)?;

        if !ledger.table_exists() {
            ledger.ensure_table()?;
        }
        let last_version = ledger.last_applied_version()?;

        let Some(max_version) = migrations.max_version() else {
            logger.info(format_args!("no migrations found"));
            return Ok(MigrationReport::unchanged(
                last_version,
                RunOutcome::NoMigrations,
            ));
        };

        if last_version > 0 {
            self.warn_on_gaps(&ledger, &migrations, last_version)?;
        }

        if max_version <= last_version {
            logger.info(format_args!(
                "migrations up-to-date (last version: {last_version})"
            ));
            return Ok(MigrationReport::unchanged(
                last_version,
                RunOutcome::UpToDate,
            ));
        }

        let executor = Executor::new(self.db, &ledger, logger, self.options.split_mode);
        let mut applied = Vec::new();
        for migration in migrations.pending_after(last_version) {
            executor.apply(migration)?;
            applied.push(AppliedMigration {
                version: migration.version,
                name: migration.name.clone(),
            });
        }

        Ok(MigrationReport {
            previous_version: last_version,
            applied,
            outcome: RunOutcome::Applied,
        })
    }

    /// Compare the ledger against the discovered set.
    ///
    /// Only warns: migrations below the last applied version are never
    /// applied, whether or not the ledger has a row for them.
    fn warn_on_gaps(
        &self,
        ledger: &Ledger<'_>,
        migrations: &MigrationSet,
        last_version: i64,
    ) -> MigrateResult<()> {
        let recorded: BTreeSet<i64> = ledger.applied()?.iter().map(|r| r.version).collect();

        for migration in migrations.iter().filter(|m| m.version <= last_version) {
            if !recorded.contains(&migration.version) {
                self.logger.warn(format_args!(
                    "migration {} ({}) is below last version {last_version} but was never applied",
                    migration.version, migration.name
                ));
            }
        }

        if let Some(max_version) = migrations.max_version() {
            if last_version > max_version {
                self.logger.warn(format_args!(
                    "ledger is ahead of migrations directory (ledger: {last_version}, directory: {max_version})"
                ));
            }
        }
        Ok(())
    }

    /// List discovered migrations with their ledger state, plus ledger rows
    /// whose script is gone. Never creates the ledger table.
    pub fn status(&self, dir: &Path) -> MigrateResult<Vec<MigrationStatus>> {
        let ledger = Ledger::new(self.db, self.logger.as_ref(), &self.options.ledger_table)?;
        let migrations = discover_migrations(dir)?;
        let rows: Vec<LedgerRow> = if ledger.table_exists() {
            ledger.applied()?
        } else {
            Vec::new()
        };

        let mut statuses: Vec<MigrationStatus> = migrations
            .iter()
            .map(|m| {
                let state = rows
                    .iter()
                    .find(|r| r.version == m.version)
                    .map_or(MigrationState::Pending, |r| MigrationState::Applied {
                        executed_at: r.executed_at.clone(),
                    });
                MigrationStatus {
                    version: m.version,
                    name: m.name.clone(),
                    state,
                }
            })
            .collect();

        statuses.extend(
            rows.into_iter()
                .filter(|r| migrations.get(r.version).is_none())
                .map(|r| MigrationStatus {
                    version: r.version,
                    name: r.title,
                    state: MigrationState::Missing {
                        executed_at: r.executed_at,
                    },
                }),
        );
        statuses.sort_by_key(|s| s.version);
        Ok(statuses)
    }
}

/// Apply pending migrations in `dir` with default options.
pub fn migrate(db: &dyn Database, dir: &Path) -> MigrateResult<MigrationReport> {
    Migrator::new(db).migrate(dir)
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
