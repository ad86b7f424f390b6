//! Error types for mg-core

use thiserror::Error;

/// Core error type for configuration and migration discovery
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// S001: Migrations directory could not be listed
    #[error("[S001] Could not open migrations directory '{path}': {source}")]
    MigrationsDirUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// S002: Entry in the migrations directory is not a SQL script
    #[error("[S002] File is not sql file: {file}")]
    NotSqlFile { file: String },

    /// S003: Filename does not split into exactly a version and a name
    #[error("[S003] Illegal migration filename {file}, can only contain _ to divide version and name like 1_create-user-table.sql")]
    IllegalFilename { file: String },

    /// S004: Version token is not a positive base-10 integer
    #[error("[S004] Illegal version in filename {file}, version can only be a single positive integer like 1_create-user-table.sql")]
    IllegalVersion { file: String },

    /// S005: Two scripts claim the same version
    #[error("[S005] Duplicate migration version {version} in {first} and {second}")]
    DuplicateVersion {
        version: i64,
        first: String,
        second: String,
    },

    /// S006: Invalid migration name for a new script
    #[error("[S006] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// C004: IO error with file path context
    #[error("[C004] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
