//! DuckDB database backend implementation
//!
//! DuckDB runs DDL inside transactions, so a failed migration on this
//! backend leaves no schema changes behind.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, SqlValue};
use duckdb::types::Value;
use duckdb::Connection;
use std::path::Path;

/// DuckDB database backend
///
/// Single-threaded, no `Mutex` needed because a migration run is sequential.
pub struct DuckDbBackend {
    conn: Connection,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn control(&self, sql: &str) -> DbResult<()> {
        log::debug!("{sql}");
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::TransactionError(format!("{sql} failed: {e}")))
    }
}

fn to_duckdb_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Integer(v) => Value::BigInt(*v),
        SqlValue::Text(v) => Value::Text(v.clone()),
    }
}

/// Read a column value as a String, trying multiple DuckDB types.
///
/// DuckDB integer columns return `None` for `Option<String>`, so we try
/// String -> i64 -> f64 -> bool -> "null".
fn get_column_as_string(row: &duckdb::Row<'_>, idx: usize) -> String {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return s;
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return n.to_string();
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return f.to_string();
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return b.to_string();
    }
    "null".to_string()
}

impl Database for DuckDbBackend {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        log::debug!("execute: {sql}");
        self.conn
            .execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))
    }

    fn execute_with_params(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        log::debug!("execute: {sql} with {} params", params.len());
        let values: Vec<Value> = params.iter().map(to_duckdb_value).collect();
        self.conn
            .execute(sql, duckdb::params_from_iter(values))
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))
    }

    fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<String>>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DbError::QueryError(format!("{e}: {sql}")))?;

        // DuckDB 1.4 panics on `stmt.column_count()` before execution, so the
        // column count is read from each row instead.
        let rows = stmt
            .query_map([], |row| {
                let col_count = row.as_ref().column_count();
                Ok((0..col_count)
                    .map(|i| get_column_as_string(row, i))
                    .collect::<Vec<_>>())
            })
            .map_err(|e| DbError::QueryError(format!("{e}: {sql}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::QueryError(format!("row error: {e}")))?;
        Ok(rows)
    }

    fn query_optional_i64(&self, sql: &str) -> DbResult<Option<i64>> {
        match self.conn.query_row(sql, [], |row| row.get::<_, i64>(0)) {
            Ok(value) => Ok(Some(value)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::QueryError(format!("{e}: {sql}"))),
        }
    }

    fn begin(&self) -> DbResult<()> {
        self.control("BEGIN TRANSACTION")
    }

    fn commit(&self) -> DbResult<()> {
        self.control("COMMIT")
    }

    fn rollback(&self) -> DbResult<()> {
        self.control("ROLLBACK")
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
