//! New command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common;

/// Execute the new command
pub fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let settings = common::load_settings(global)?;
    let migration = mg_core::create_migration(&settings.migrations_dir, &args.name)
        .with_context(|| format!("Failed to create migration '{}'", args.name))?;

    common::verbose(global, &format!("Version {}", migration.version));
    println!("Created {}", migration.path.display());
    Ok(())
}
