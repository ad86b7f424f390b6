//! Status command implementation

use anyhow::{Context, Result};
use mg_migrate::{MigrationState, MigrationStatus};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common;

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let settings = common::load_settings(global)?;
    let options = common::options_from_config(&settings.config);
    common::verbose(
        global,
        &format!(
            "Reading ledger {} in {}",
            options.ledger_table, settings.database_path
        ),
    );

    let db = common::open_database(&settings)?;
    let statuses = common::migrator(&db, options, args.output == StatusOutput::Json)
        .status(&settings.migrations_dir)
        .context("Failed to read migration status")?;

    match args.output {
        StatusOutput::Table => {
            if statuses.is_empty() {
                println!("No migrations found.");
            } else {
                let (headers, rows) = table_rows(&statuses);
                common::print_table(&headers, &rows);
                println!();
                println!("{}", counts(&statuses));
            }
        }
        StatusOutput::Json => {
            let json = serde_json::to_string_pretty(&statuses)
                .context("Failed to serialize migration status")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn table_rows(statuses: &[MigrationStatus]) -> ([&'static str; 4], Vec<Vec<String>>) {
    let rows = statuses
        .iter()
        .map(|s| {
            let (state, executed_at) = match &s.state {
                MigrationState::Applied { executed_at } => ("applied", executed_at.as_str()),
                MigrationState::Pending => ("pending", "-"),
                MigrationState::Missing { executed_at } => ("missing", executed_at.as_str()),
            };
            vec![
                s.version.to_string(),
                s.name.clone(),
                state.to_string(),
                executed_at.to_string(),
            ]
        })
        .collect();
    (["VERSION", "NAME", "STATE", "EXECUTED_AT"], rows)
}

fn counts(statuses: &[MigrationStatus]) -> String {
    let mut applied = 0;
    let mut pending = 0;
    let mut missing = 0;
    for status in statuses {
        match status.state {
            MigrationState::Applied { .. } => applied += 1,
            MigrationState::Pending => pending += 1,
            MigrationState::Missing { .. } => missing += 1,
        }
    }
    format!("{applied} applied, {pending} pending, {missing} missing")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(version: i64, name: &str, state: MigrationState) -> MigrationStatus {
        MigrationStatus {
            version,
            name: name.to_string(),
            state,
        }
    }

    #[test]
    fn test_table_rows_and_counts() {
        let statuses = vec![
            status(
                1,
                "create-users",
                MigrationState::Applied {
                    executed_at: "2024-05-01 10:00:00".to_string(),
                },
            ),
            status(2, "add-email", MigrationState::Pending),
        ];

        let (headers, rows) = table_rows(&statuses);
        assert_eq!(headers[2], "STATE");
        assert_eq!(
            rows[1],
            vec!["2", "add-email", "pending", "-"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        assert_eq!(counts(&statuses), "1 applied, 1 pending, 0 missing");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(vec![status(
            3,
            "gone",
            MigrationState::Missing {
                executed_at: "2024-05-01 10:00:00".to_string(),
            },
        )])
        .unwrap();
        assert_eq!(json[0]["version"], 3);
        assert_eq!(json[0]["state"], "missing");
        assert_eq!(json[0]["executed_at"], "2024-05-01 10:00:00");
    }
}
