//! Migration descriptor and directory scanner
//!
//! A migrations directory is flat: every regular file must be named
//! `<version>_<name>.sql`. One malformed filename invalidates the whole
//! directory.

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Substring that marks a file as a SQL script.
pub const SQL_MARKER: &str = ".sql";

/// Separator between the version and the name in a filename.
pub const NAME_SEPARATOR: char = '_';

/// One discoverable migration script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Positive version, unique within a scan
    pub version: i64,
    /// Label taken from the filename, used for logging and the ledger
    pub name: String,
    /// Path to the script
    pub path: PathBuf,
}

impl Migration {
    /// Parse a filename like `3_add-index.sql` into a migration rooted at `dir`.
    pub fn from_file_name(dir: &Path, file_name: &str) -> CoreResult<Self> {
        if !file_name.contains(SQL_MARKER) {
            return Err(CoreError::NotSqlFile {
                file: file_name.to_string(),
            });
        }

        let stem = file_name.replace(SQL_MARKER, "");
        let parts: Vec<&str> = stem.split(NAME_SEPARATOR).collect();
        let [version_token, name] = parts.as_slice() else {
            return Err(CoreError::IllegalFilename {
                file: file_name.to_string(),
            });
        };
        if name.is_empty() {
            return Err(CoreError::IllegalFilename {
                file: file_name.to_string(),
            });
        }

        let version = version_token
            .parse::<i64>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| CoreError::IllegalVersion {
                file: file_name.to_string(),
            })?;

        Ok(Self {
            version,
            name: (*name).to_string(),
            path: dir.join(file_name),
        })
    }

    /// Filename of the script, for error messages
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// Migrations found in one directory scan, keyed and ordered by version
#[derive(Debug, Clone, Default)]
pub struct MigrationSet {
    by_version: BTreeMap<i64, Migration>,
}

impl MigrationSet {
    /// Versions in ascending order
    pub fn versions(&self) -> Vec<i64> {
        self.by_version.keys().copied().collect()
    }

    /// Highest discovered version, if any
    pub fn max_version(&self) -> Option<i64> {
        self.by_version.keys().next_back().copied()
    }

    pub fn get(&self, version: i64) -> Option<&Migration> {
        self.by_version.get(&version)
    }

    /// Migrations in ascending version order
    pub fn iter(&self) -> impl Iterator<Item = &Migration> {
        self.by_version.values()
    }

    /// Migrations with a version strictly greater than `after`, ascending
    pub fn pending_after(&self, after: i64) -> impl Iterator<Item = &Migration> {
        self.by_version
            .range(after.saturating_add(1)..)
            .map(|(_, m)| m)
    }

    pub fn len(&self) -> usize {
        self.by_version.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_version.is_empty()
    }

    fn insert(&mut self, migration: Migration) -> CoreResult<()> {
        if let Some(existing) = self.by_version.get(&migration.version) {
            // Report the pair in a stable order regardless of readdir order.
            let (first, second) = ordered_pair(existing.file_name(), migration.file_name());
            return Err(CoreError::DuplicateVersion {
                version: migration.version,
                first,
                second,
            });
        }
        self.by_version.insert(migration.version, migration);
        Ok(())
    }
}

fn ordered_pair(a: String, b: String) -> (String, String) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Scan `dir` for migration scripts.
///
/// Subdirectories are skipped. Any other entry that is not a well-formed
/// `<version>_<name>.sql` file (including a name that is not valid UTF-8)
/// fails the whole scan, as does a version
/// claimed by two files. An empty directory yields an empty set.
pub fn discover_migrations(dir: &Path) -> CoreResult<MigrationSet> {
    let unreadable = |source| CoreError::MigrationsDirUnreadable {
        path: dir.display().to_string(),
        source,
    };

    let mut set = MigrationSet::default();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let file_name = entry.file_name().into_string().map_err(|raw| {
            CoreError::IllegalFilename {
                file: raw.to_string_lossy().into_owned(),
            }
        })?;
        let migration = Migration::from_file_name(dir, &file_name)?;
        log::debug!(
            "discovered migration v{} ({}) at {}",
            migration.version,
            migration.name,
            path.display()
        );
        set.insert(migration)?;
    }
    Ok(set)
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
