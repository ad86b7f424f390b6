//! Database trait definition

use crate::error::DbResult;
use std::fmt;

/// A bound parameter for [`Database::execute_with_params`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Integer(v) => write!(f, "{v}"),
            SqlValue::Text(v) => write!(f, "'{v}'"),
        }
    }
}

/// Database abstraction the migration runner drives
///
/// Calls are blocking and made from the caller's thread. The runner assumes
/// exclusive use of the connection for the duration of a run, and opens at
/// most one transaction at a time.
pub trait Database {
    /// Execute a single statement, returns affected rows
    fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a single statement with positional `?` parameters
    fn execute_with_params(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Run a query and return every row with each column rendered as text
    fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<String>>>;

    /// Read the first column of the first row as an integer.
    ///
    /// Returns `Ok(None)` when the query yields no rows.
    fn query_optional_i64(&self, sql: &str) -> DbResult<Option<i64>>;

    /// Open a transaction
    fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    fn rollback(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
