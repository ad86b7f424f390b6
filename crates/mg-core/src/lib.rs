//! mg-core - Core library for the migrator
//!
//! This crate provides configuration parsing, migration discovery and
//! statement splitting shared by the runner and the CLI. Nothing here talks
//! to a database.

pub mod config;
pub mod error;
pub mod migration;
pub mod scaffold;
pub mod splitter;
pub mod sql_utils;

pub use config::{Config, DatabaseConfig, DEFAULT_LEDGER_TABLE};
pub use error::{CoreError, CoreResult};
pub use migration::{discover_migrations, Migration, MigrationSet};
pub use scaffold::create_migration;
pub use splitter::{split_statements, SplitMode};
