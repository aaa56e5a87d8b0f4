use super::*;
use mg_db::test_utils::FaultInjector;
use mg_db::DuckDbExecutor;

fn ledger() -> Ledger {
    Ledger::new(Duration::ZERO, Duration::ZERO)
}

fn db() -> DuckDbExecutor {
    DuckDbExecutor::in_memory().unwrap()
}

fn tagged(raw: &str) -> Version {
    Version::parse(raw).unwrap()
}

#[test]
fn test_read_version_without_table_is_none() {
    let mut db = db();
    assert_eq!(ledger().read_version(&mut db).unwrap(), Version::None);
    assert!(!db.table_exists(VERSION_TABLE).unwrap());
}

#[test]
fn test_write_then_read_version() {
    let mut db = db();
    let ledger = ledger();
    ledger.write_version(&mut db, &Version::Init).unwrap();
    assert_eq!(ledger.read_version(&mut db).unwrap(), Version::Init);

    ledger
        .write_version(&mut db, &tagged("200101T000000"))
        .unwrap();
    assert_eq!(
        ledger.read_version(&mut db).unwrap(),
        tagged("200101T000000")
    );
    let rows = db.query("SELECT count(*) FROM _migrate_version").unwrap();
    assert_eq!(rows[0][0], "1");
}

#[test]
fn test_write_none_empties_table() {
    let mut db = db();
    let ledger = ledger();
    ledger.write_version(&mut db, &Version::Init).unwrap();
    ledger.write_version(&mut db, &Version::None).unwrap();
    assert!(db.table_exists(VERSION_TABLE).unwrap());
    assert_eq!(ledger.read_version(&mut db).unwrap(), Version::None);
}

#[test]
fn test_write_version_retries_transient_failure() {
    let mut db = FaultInjector::new(db()).fail_transaction(1);
    ledger().write_version(&mut db, &Version::Init).unwrap();
    assert_eq!(db.transaction_attempts(), 2);
    assert_eq!(db.reconnects(), 1);
    assert_eq!(ledger().read_version(&mut db).unwrap(), Version::Init);
}

#[test]
fn test_write_version_exhausted_keeps_previous_value() {
    let mut plain = db();
    ledger().write_version(&mut plain, &Version::Init).unwrap();

    let mut db = FaultInjector::new(plain).fail_all_transactions();
    let err = ledger()
        .write_version(&mut db, &tagged("200101T000000"))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::AttemptsExhausted { attempts: 3, .. }
    ));
    assert_eq!(ledger().read_version(&mut db).unwrap(), Version::Init);
}

#[test]
fn test_history_empty_without_table() {
    let mut db = db();
    assert!(ledger().history(&mut db, 20).unwrap().is_empty());
}

#[test]
fn test_append_history_newest_first() {
    let mut db = db();
    let ledger = ledger();
    ledger
        .append_history(&mut db, &Version::None, &Version::Init)
        .unwrap();
    ledger
        .append_history(&mut db, &Version::Init, &tagged("200101T000000"))
        .unwrap();

    let entries = ledger.history(&mut db, DEFAULT_HISTORY_LIMIT).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].from, Version::Init);
    assert_eq!(entries[0].to, tagged("200101T000000"));
    assert_eq!(entries[1].from, Version::None);
    assert_eq!(entries[1].to, Version::Init);
    assert!(entries[0].date >= entries[1].date);

    let stored = db
        .query("SELECT from_version FROM _migrate_history ORDER BY date")
        .unwrap();
    assert_eq!(stored[0][0], "null");
}

#[test]
fn test_history_limit() {
    let mut db = db();
    let ledger = ledger();
    for _ in 0..3 {
        ledger
            .append_history(&mut db, &Version::None, &Version::Init)
            .unwrap();
    }
    assert_eq!(ledger.history(&mut db, 2).unwrap().len(), 2);
}

#[test]
fn test_history_rejects_corrupt_rows() {
    let mut db = db();
    ledger()
        .append_history(&mut db, &Version::None, &Version::Init)
        .unwrap();
    db.execute_batch("UPDATE _migrate_history SET to_version = 'garbage'")
        .unwrap();
    let err = ledger().history(&mut db, 20).unwrap_err();
    assert!(matches!(err, EngineError::InvalidHistoryRow { .. }));
}

#[test]
fn test_read_version_retries_transient_failure() {
    let mut plain = db();
    ledger().write_version(&mut plain, &Version::Init).unwrap();

    let mut db = FaultInjector::new(plain).fail_query(1);
    assert_eq!(ledger().read_version(&mut db).unwrap(), Version::Init);
    assert_eq!(db.reconnects(), 1);
}

#[test]
fn test_history_read_exhausted() {
    let mut plain = db();
    ledger()
        .append_history(&mut plain, &Version::None, &Version::Init)
        .unwrap();

    let mut db = FaultInjector::new(plain)
        .fail_query(1)
        .fail_query(2)
        .fail_query(3);
    let err = ledger().history(&mut db, 20).unwrap_err();
    assert!(matches!(
        err,
        EngineError::AttemptsExhausted { attempts: 3, .. }
    ));
}
