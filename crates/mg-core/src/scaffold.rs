//! Creating new migration scripts

use crate::error::{CoreError, CoreResult};
use crate::migration::{discover_migrations, Migration, NAME_SEPARATOR, SQL_MARKER};
use chrono::Utc;
use std::path::Path;

/// Write an empty `<next>_<name>.sql` script into `dir` and return it.
///
/// `next` is one more than the highest version already in `dir`, so the
/// directory must scan cleanly first. The directory is created if missing.
pub fn create_migration(dir: &Path, name: &str) -> CoreResult<Migration> {
    validate_name(name)?;

    std::fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let next = discover_migrations(dir)?
        .max_version()
        .unwrap_or(0)
        .saturating_add(1);
    let file_name = format!("{next}{NAME_SEPARATOR}{name}{SQL_MARKER}");
    let migration = Migration::from_file_name(dir, &file_name)?;

    let template = format!(
        "-- Migration: {name}\n\
         -- Version: {next}\n\
         -- Created: {}\n\
         --\n\
         -- Write the statements for this migration below.\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    std::fs::write(&migration.path, template).map_err(|e| CoreError::IoWithPath {
        path: migration.path.display().to_string(),
        source: e,
    })?;

    Ok(migration)
}

fn validate_name(name: &str) -> CoreResult<()> {
    let reason = if name.is_empty() {
        Some("name cannot be empty")
    } else if name.contains(NAME_SEPARATOR) {
        Some("name cannot contain '_', use '-' instead")
    } else if name.contains(SQL_MARKER) || name.contains('.') {
        Some("name cannot contain '.'")
    } else if name.chars().any(|c| c == '/' || c == '\\' || c.is_whitespace()) {
        Some("name cannot contain path separators or whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
