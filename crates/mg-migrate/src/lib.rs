//! mg-migrate - Sequential schema-migration runner
//!
//! Given a directory of `<version>_<name>.sql` scripts and a [`Database`],
//! applies every script above the last recorded version in ascending order,
//! one transaction per script, and records each success in a ledger table.
//!
//! ```no_run
//! use mg_db::DuckDbBackend;
//! use mg_migrate::Migrator;
//! use std::path::Path;
//!
//! let db = DuckDbBackend::new("app.duckdb")?;
//! let report = Migrator::new(&db)
//!     .with_log_fn(|args| println!("{args}"))
//!     .migrate(Path::new("migrations"))?;
//! println!("now at version {}", report.current_version());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`Database`]: mg_db::Database

pub mod error;
pub mod executor;
pub mod ledger;
pub mod logger;
pub mod migrator;

pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, LedgerRow};
pub use logger::{LogCrateLogger, MigrationLogger};
pub use migrator::{
    migrate, AppliedMigration, MigrationReport, MigrationState, MigrationStatus, Migrator,
    MigratorOptions, RunOutcome,
};
