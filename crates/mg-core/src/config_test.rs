use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.migrations_dir, "migrations");
    assert_eq!(config.ledger_table, DEFAULT_LEDGER_TABLE);
    assert_eq!(config.statement_splitting, SplitMode::Naive);
    assert_eq!(config.database.path, "app.duckdb");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
migrations_dir: db/migrations
ledger_table: ops.schema_versions
statement_splitting: quote_aware
database:
  path: ":memory:"
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.migrations_dir, "db/migrations");
    assert_eq!(config.ledger_table, "ops.schema_versions");
    assert_eq!(config.statement_splitting, SplitMode::QuoteAware);
    assert_eq!(config.database.path, ":memory:");
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("migration_dir: typo");
    assert!(result.is_err());
}

#[test]
fn test_invalid_ledger_table_rejected() {
    let config = Config {
        ledger_table: "versions; DROP TABLE users".to_string(),
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_empty_migrations_dir_rejected() {
    let config = Config {
        migrations_dir: "  ".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("migrator.yml"), "migrations_dir: a\n").unwrap();
    std::fs::write(dir.path().join("migrator.yaml"), "migrations_dir: b\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.migrations_dir, "a");
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("migrator.yaml"), "migrations_dir: sql\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(
        config.migrations_dir_absolute(dir.path()),
        dir.path().join("sql")
    );
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir_or_default_falls_back() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from_dir_or_default(dir.path()).unwrap();
    assert_eq!(config.ledger_table, DEFAULT_LEDGER_TABLE);
}

#[test]
fn test_load_parse_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("migrator.yml");
    std::fs::write(&path, "database: [not, a, map]\n").unwrap();

    let err = Config::load_from_dir_or_default(dir.path()).unwrap_err();
    match err {
        CoreError::ConfigParseError { path: p, .. } => assert!(p.ends_with("migrator.yml")),
        other => panic!("unexpected error: {other}"),
    }
}
