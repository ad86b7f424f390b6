//! Error types for mg-migrate

use mg_core::CoreError;
use mg_db::DbError;
use thiserror::Error;

/// Migration run errors
///
/// Every variant aborts the run. Migrations committed before the failure
/// stay committed.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Discovery failed before any database mutation (M001)
    #[error("[M001] Migration discovery failed: {0}")]
    Discovery(#[from] CoreError),

    /// Ledger table could not be created (M002)
    #[error("[M002] Could not create migrator table {table}: {source}")]
    LedgerCreate { table: String, source: DbError },

    /// Ledger could not be read (M003)
    #[error("[M003] Error checking version in {table}: {source}")]
    LedgerQuery { table: String, source: DbError },

    /// Migration script could not be read (M004)
    #[error("[M004] Could not read migration file {name} ({path}): {source}")]
    ReadScript {
        name: String,
        path: String,
        source: std::io::Error,
    },

    /// Transaction could not be opened (M005)
    #[error("[M005] Could not initiate transaction for migration {name}: {source}")]
    Begin { name: String, source: DbError },

    /// A statement failed; the migration was rolled back (M006)
    #[error("[M006] Error during migration {name} at statement {statement}, rolled back, cause: {source}")]
    Statement {
        name: String,
        statement: usize,
        source: DbError,
    },

    /// The ledger row could not be written; the migration was rolled back (M007)
    #[error("[M007] Error recording migration {name} in {table}, rolled back, cause: {source}")]
    Record {
        name: String,
        table: String,
        source: DbError,
    },

    /// Commit failed (M008)
    ///
    /// Statements the engine cannot roll back may already have taken effect.
    #[error("[M008] Error during commit of migration {name}, rolled back, cause: {source}")]
    Commit { name: String, source: DbError },

    /// Ledger table name is not a plain identifier (M009)
    #[error("[M009] Invalid migrator table name '{0}'")]
    InvalidLedgerTable(String),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
