//! Configuration types and parsing for migrator.yml

use crate::error::{CoreError, CoreResult};
use crate::splitter::SplitMode;
use crate::sql_utils::is_valid_table_name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default name of the ledger table that records applied migrations.
pub const DEFAULT_LEDGER_TABLE: &str = "gomigrator_version";

const CONFIG_FILE_NAMES: [&str; 2] = ["migrator.yml", "migrator.yaml"];

/// Runner configuration from migrator.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding `<version>_<name>.sql` scripts, relative to the project directory
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Table used to record applied migrations
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// How migration scripts are split into statements
    #[serde(default)]
    pub statement_splitting: SplitMode,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            ledger_table: default_ledger_table(),
            statement_splitting: SplitMode::default(),
            database: DatabaseConfig::default(),
        }
    }
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_ledger_table() -> String {
    DEFAULT_LEDGER_TABLE.to_string()
}

fn default_db_path() -> String {
    "app.duckdb".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for migrator.yml or migrator.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Like [`Config::load_from_dir`], but falls back to defaults when the
    /// directory has no config file.
    pub fn load_from_dir_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::load_from_dir(dir) {
            Err(CoreError::ConfigNotFound { path }) => {
                log::debug!("no config at {path}, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Absolute migrations directory for a project rooted at `root`
    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }

        if !is_valid_table_name(&self.ledger_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "ledger_table '{}' must be an identifier like gomigrator_version or schema.table",
                    self.ledger_table
                ),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
