//! Version ledger: the table recording which migrations have been applied.
//!
//! Rows are append-only. A row for version V exists if and only if every
//! statement of migration V was committed, which is why
//! [`Ledger::record_applied`] is only ever called inside the migration's own
//! transaction.

use crate::error::{MigrateError, MigrateResult};
use crate::logger::MigrationLogger;
use mg_core::sql_utils::{is_valid_table_name, quote_ident, quote_qualified};
use mg_db::{Database, DbError, DbResult, SqlValue};

/// One applied migration as stored in the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub version: i64,
    pub title: String,
    pub executed_at: String,
}

/// Handle on the ledger table in the target database
pub struct Ledger<'a> {
    db: &'a dyn Database,
    logger: &'a dyn MigrationLogger,
    table: String,
    quoted: String,
}

impl<'a> Ledger<'a> {
    /// Create a handle for `table`, rejecting names that are not plain identifiers.
    pub fn new(
        db: &'a dyn Database,
        logger: &'a dyn MigrationLogger,
        table: &str,
    ) -> MigrateResult<Self> {
        if !is_valid_table_name(table) {
            return Err(MigrateError::InvalidLedgerTable(table.to_string()));
        }
        Ok(Self {
            db,
            logger,
            table: table.to_string(),
            quoted: quote_qualified(table),
        })
    }

    /// Unquoted table name, for messages
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Probe the table with a bounded read.
    ///
    /// Any error counts as "absent": a missing table and a broken connection
    /// look the same here. A broken connection surfaces on the next call.
    pub fn table_exists(&self) -> bool {
        let probe = format!("SELECT * FROM {} LIMIT 1", self.quoted);
        match self.db.query_rows(&probe) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("ledger table {} not readable: {e}", self.table);
                false
            }
        }
    }

    /// Create the table (and its schema, when qualified) if it does not exist.
    pub fn ensure_table(&self) -> MigrateResult<()> {
        let create_err = |source| MigrateError::LedgerCreate {
            table: self.table.clone(),
            source,
        };

        if let Some((schema, _)) = self.table.split_once('.') {
            self.db
                .execute(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema)))
                .map_err(create_err)?;
        }

        self.db
            .execute(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                     version     BIGINT NOT NULL UNIQUE,
                     title       VARCHAR NOT NULL,
                     executed_at TIMESTAMP NOT NULL DEFAULT now()
                 )",
                self.quoted
            ))
            .map_err(create_err)?;
        Ok(())
    }

    /// Highest recorded version, or 0 when nothing has been applied yet.
    pub fn last_applied_version(&self) -> MigrateResult<i64> {
        let sql = format!(
            "SELECT version FROM {} ORDER BY version DESC LIMIT 1",
            self.quoted
        );
        match self.db.query_optional_i64(&sql).map_err(|source| {
            MigrateError::LedgerQuery {
                table: self.table.clone(),
                source,
            }
        })? {
            Some(version) => {
                self.logger
                    .info(format_args!("last migration version: {version}"));
                Ok(version)
            }
            None => {
                self.logger
                    .info(format_args!("no previous migration versions detected"));
                Ok(0)
            }
        }
    }

    /// All recorded rows, ascending by version
    pub fn applied(&self) -> MigrateResult<Vec<LedgerRow>> {
        let query_err = |source| MigrateError::LedgerQuery {
            table: self.table.clone(),
            source,
        };
        let sql = format!(
            "SELECT version, title, CAST(executed_at AS VARCHAR) FROM {} ORDER BY version",
            self.quoted
        );

        self.db
            .query_rows(&sql)
            .map_err(query_err)?
            .into_iter()
            .map(|row| match row.as_slice() {
                [version, title, executed_at] => {
                    let version = version.parse::<i64>().map_err(|e| {
                        query_err(DbError::QueryError(format!(
                            "unreadable version '{version}': {e}"
                        )))
                    })?;
                    Ok(LedgerRow {
                        version,
                        title: title.clone(),
                        executed_at: executed_at.clone(),
                    })
                }
                other => Err(query_err(DbError::QueryError(format!(
                    "expected 3 columns, got {}",
                    other.len()
                )))),
            })
            .collect()
    }

    /// Insert the row for a freshly applied migration.
    ///
    /// Must run inside the migration's transaction. A duplicate version
    /// (e.g. a concurrent runner got there first) fails on the table's
    /// uniqueness constraint and is returned as-is.
    pub fn record_applied(&self, version: i64, name: &str) -> DbResult<usize> {
        self.db.execute_with_params(
            &format!("INSERT INTO {} (version, title) VALUES (?, ?)", self.quoted),
            &[SqlValue::Integer(version), SqlValue::Text(name.to_string())],
        )
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
