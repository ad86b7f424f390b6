//! mg-db - Database abstraction layer for the migrator
//!
//! This crate provides the `Database` trait the runner talks to and a
//! DuckDB implementation of it.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, SqlValue};
