use super::*;
use crate::logger::LogCrateLogger;
use mg_db::DuckDbBackend;
use std::cell::RefCell;
use std::fmt;

fn count(db: &DuckDbBackend, sql: &str) -> i64 {
    db.query_optional_i64(sql).unwrap().unwrap()
}

#[test]
fn rejects_unsafe_table_name() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = Ledger::new(&db, &LogCrateLogger, "x; DROP TABLE y")
        .err()
        .unwrap();
    assert!(matches!(err, MigrateError::InvalidLedgerTable(_)));
}

#[test]
fn table_absent_then_present() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, &LogCrateLogger, "gomigrator_version").unwrap();

    assert!(!ledger.table_exists());
    ledger.ensure_table().unwrap();
    assert!(ledger.table_exists());
}

#[test]
fn ensure_table_is_idempotent() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, &LogCrateLogger, "gomigrator_version").unwrap();

    ledger.ensure_table().unwrap();
    ledger.record_applied(1, "a").unwrap();
    ledger.ensure_table().unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM gomigrator_version"), 1);
}

#[test]
fn ensure_table_creates_schema_for_qualified_name() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, &LogCrateLogger, "ops.versions").unwrap();

    ledger.ensure_table().unwrap();
    assert!(ledger.table_exists());
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = 'ops' AND table_name = 'versions'"
        ),
        1
    );
}

#[test]
fn last_applied_version_zero_when_empty() {
    let db = DuckDbBackend::in_memory().unwrap();
    let lines = RefCell::new(Vec::new());
    let logger = |args: fmt::Arguments<'_>| lines.borrow_mut().push(args.to_string());
    let ledger = Ledger::new(&db, &logger, "gomigrator_version").unwrap();
    ledger.ensure_table().unwrap();

    assert_eq!(ledger.last_applied_version().unwrap(), 0);
    assert_eq!(
        lines.borrow().as_slice(),
        ["no previous migration versions detected".to_string()]
    );
}

#[test]
fn last_applied_version_is_maximum() {
    let db = DuckDbBackend::in_memory().unwrap();
    let lines = RefCell::new(Vec::new());
    let logger = |args: fmt::Arguments<'_>| lines.borrow_mut().push(args.to_string());
    let ledger = Ledger::new(&db, &logger, "gomigrator_version").unwrap();
    ledger.ensure_table().unwrap();
    for (v, name) in [(2, "b"), (10, "j"), (3, "c")] {
        ledger.record_applied(v, name).unwrap();
    }

    assert_eq!(ledger.last_applied_version().unwrap(), 10);
    assert_eq!(
        lines.borrow().as_slice(),
        ["last migration version: 10".to_string()]
    );
}

#[test]
fn last_applied_version_fails_without_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, &LogCrateLogger, "gomigrator_version").unwrap();

    let err = ledger.last_applied_version().unwrap_err();
    assert!(matches!(err, MigrateError::LedgerQuery { .. }));
}

#[test]
fn record_applied_rejects_duplicate_version() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, &LogCrateLogger, "gomigrator_version").unwrap();
    ledger.ensure_table().unwrap();

    ledger.record_applied(1, "a").unwrap();
    assert!(ledger.record_applied(1, "again").is_err());
}

#[test]
fn applied_rows_are_ordered_and_timestamped() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, &LogCrateLogger, "gomigrator_version").unwrap();
    ledger.ensure_table().unwrap();
    ledger.record_applied(5, "later").unwrap();
    ledger.record_applied(1, "first").unwrap();

    let rows = ledger.applied().unwrap();
    let versions: Vec<i64> = rows.iter().map(|r| r.version).collect();
    assert_eq!(versions, vec![1, 5]);
    assert_eq!(rows[0].title, "first");
    assert!(!rows[0].executed_at.is_empty());
    assert_ne!(rows[0].executed_at, "null");
}
