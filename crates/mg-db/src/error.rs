//! Error types for mg-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// BEGIN / COMMIT / ROLLBACK failed (D003)
    #[error("[D003] Transaction control failed: {0}")]
    TransactionError(String),

    /// Query returned an error or unreadable rows (D004)
    #[error("[D004] Query failed: {0}")]
    QueryError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
