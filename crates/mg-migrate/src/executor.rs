//! Applies one migration inside its own transaction.
//!
//! The script's statements and the ledger insert commit together or not at
//! all. Engines that auto-commit DDL (MySQL, for one) can still leave schema
//! changes behind after a rollback; DuckDB and PostgreSQL do not.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::Ledger;
use crate::logger::MigrationLogger;
use mg_core::{split_statements, Migration, SplitMode};
use mg_db::Database;

/// Runs single migrations against a database
pub struct Executor<'a> {
    db: &'a dyn Database,
    ledger: &'a Ledger<'a>,
    logger: &'a dyn MigrationLogger,
    split_mode: SplitMode,
}

impl<'a> Executor<'a> {
    pub fn new(
        db: &'a dyn Database,
        ledger: &'a Ledger<'a>,
        logger: &'a dyn MigrationLogger,
        split_mode: SplitMode,
    ) -> Self {
        Self {
            db,
            ledger,
            logger,
            split_mode,
        }
    }

    /// Apply `migration` and record it, or leave no ledger row behind.
    pub fn apply(&self, migration: &Migration) -> MigrateResult<()> {
        let name = migration.name.as_str();
        let sql = std::fs::read_to_string(&migration.path).map_err(|source| {
            MigrateError::ReadScript {
                name: name.to_string(),
                path: migration.path.display().to_string(),
                source,
            }
        })?;
        let statements = split_statements(&sql, self.split_mode);
        log::debug!(
            "applying migration v{} ({name}): {} statements",
            migration.version,
            statements.len()
        );

        self.db.begin().map_err(|source| MigrateError::Begin {
            name: name.to_string(),
            source,
        })?;

        for (idx, statement) in statements.iter().enumerate() {
            if let Err(source) = self.db.execute(statement) {
                self.rollback(name);
                return Err(MigrateError::Statement {
                    name: name.to_string(),
                    statement: idx + 1,
                    source,
                });
            }
        }

        if let Err(source) = self.ledger.record_applied(migration.version, name) {
            self.rollback(name);
            return Err(MigrateError::Record {
                name: name.to_string(),
                table: self.ledger.table().to_string(),
                source,
            });
        }

        if let Err(source) = self.db.commit() {
            self.rollback(name);
            return Err(MigrateError::Commit {
                name: name.to_string(),
                source,
            });
        }

        self.logger
            .info(format_args!("successfully migrated: {name}"));
        Ok(())
    }

    /// Best-effort rollback; the original failure is what gets reported.
    fn rollback(&self, name: &str) {
        if let Err(e) = self.db.rollback() {
            log::warn!("rollback of migration {name} failed: {e}");
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
