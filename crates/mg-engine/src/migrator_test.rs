use super::*;
use crate::confirm::AutoConfirm;
use mg_core::{Direction, Migration, MigrationCode, Part, ScriptRef};
use mg_db::DuckDbExecutor;

const STATE_SQL: &str =
    "SELECT count(*) FROM information_schema.tables WHERE table_name IN ('p1', 'p2')";

fn v(raw: &str) -> Version {
    Version::parse(raw).unwrap()
}

fn registry() -> Registry {
    let init = Migration::baseline(
        MigrationCode::try_new("init").unwrap(),
        Part::new(
            ScriptRef::inline("up.sql", "CREATE TABLE base (id INT);"),
            ScriptRef::inline("down.sql", "DROP TABLE base;"),
        ),
    );
    let parts = (1..=2)
        .map(|n| {
            Part::new(
                ScriptRef::inline(format!("{n}.up.sql"), format!("CREATE TABLE p{n} (id INT);")),
                ScriptRef::inline(format!("{n}.down.sql"), format!("DROP TABLE p{n};")),
            )
        })
        .collect();
    let second = Migration::multi_part(
        v("200101T000000"),
        MigrationCode::try_new("parts").unwrap(),
        ScriptRef::inline("state.sql", STATE_SQL),
        parts,
    )
    .unwrap();
    Registry::from_migrations([init, second], false).unwrap()
}

fn migrator() -> Migrator<DuckDbExecutor, AutoConfirm> {
    Migrator::new(
        DuckDbExecutor::in_memory().unwrap(),
        AutoConfirm(false),
        registry(),
        ExecutorSettings::immediate(),
    )
}

#[test]
fn test_fresh_database_is_at_null() {
    let mut m = migrator();
    assert_eq!(m.current_version().unwrap(), Version::None);
    assert!(m.history(20).unwrap().is_empty());
}

#[test]
fn test_migrate_latest_applies_every_step() {
    let mut m = migrator();
    let summary = m.migrate(&Target::Latest).unwrap();

    assert_eq!(summary.from, Version::None);
    assert_eq!(summary.to, Some(v("200101T000000")));
    assert_eq!(summary.steps.len(), 2);
    assert!(summary.is_fully_recorded());
    assert_eq!(m.current_version().unwrap(), v("200101T000000"));
    assert!(m.db_mut().table_exists("p2").unwrap());

    let history = m.history(20).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].from, Version::Init);
    assert_eq!(history[0].to, v("200101T000000"));
}

#[test]
fn test_migrate_latest_twice_is_noop() {
    let mut m = migrator();
    m.migrate(&Target::Latest).unwrap();
    let summary = m.migrate(&Target::Latest).unwrap();
    assert!(summary.is_noop());
    assert!(summary.steps.is_empty());
    assert_eq!(m.history(20).unwrap().len(), 2);
}

#[test]
fn test_migrate_previous_steps_back_once() {
    let mut m = migrator();
    m.migrate(&Target::Latest).unwrap();
    let summary = m.migrate(&Target::Previous).unwrap();

    assert_eq!(summary.steps.len(), 1);
    assert_eq!(summary.steps[0].direction, Direction::Down);
    assert_eq!(m.current_version().unwrap(), Version::Init);
    assert!(!m.db_mut().table_exists("p1").unwrap());
    assert!(m.db_mut().table_exists("base").unwrap());
}

#[test]
fn test_migrate_previous_from_null_is_noop() {
    let mut m = migrator();
    assert!(m.migrate(&Target::Previous).unwrap().is_noop());
}

#[test]
fn test_migrate_exact_null_reverts_everything() {
    let mut m = migrator();
    m.migrate(&Target::Latest).unwrap();
    let summary = m.migrate(&Target::Exact(Version::None)).unwrap();

    let versions: Vec<_> = summary.steps.iter().map(|s| s.version.clone()).collect();
    assert_eq!(versions, vec![v("200101T000000"), Version::Init]);
    assert_eq!(m.current_version().unwrap(), Version::None);
    assert!(!m.db_mut().table_exists("base").unwrap());
}

#[test]
fn test_migrate_exact_unknown_is_rejected() {
    let mut m = migrator();
    let err = m
        .migrate(&Target::Exact(v("300101T000000")))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::UnknownVersion { .. })
    ));
    assert!(!m.db_mut().table_exists("base").unwrap());
}

#[test]
fn test_mark_version_skips_scripts() {
    let mut m = migrator();
    m.mark_version(&Version::Init).unwrap();
    assert_eq!(m.current_version().unwrap(), Version::Init);
    assert!(!m.db_mut().table_exists("base").unwrap());
    assert!(m.history(20).unwrap().is_empty());

    let current = m.current_version().unwrap();
    let plan = m.build_plan(&current, &v("200101T000000")).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.steps()[0].from, Version::Init);
}

#[test]
fn test_mark_unknown_version_is_rejected() {
    let mut m = migrator();
    assert!(m.mark_version(&Version::Dev).is_err());
    assert_eq!(m.current_version().unwrap(), Version::None);
}

#[test]
fn test_unknown_current_version_is_fatal() {
    let mut m = migrator();
    let ledger = m.executor().ledger().clone();
    ledger.write_version(m.db_mut(), &v("250101T000000")).unwrap();

    assert!(matches!(
        m.current_version(),
        Err(EngineError::UnknownCurrentVersion { .. })
    ));
    assert!(m.migrate(&Target::Latest).is_err());
}

#[test]
fn test_build_plan_validates_both_ends() {
    let m = migrator();
    assert!(matches!(
        m.build_plan(&v("250101T000000"), &Version::Init),
        Err(EngineError::UnknownCurrentVersion { .. })
    ));
    assert!(matches!(
        m.build_plan(&Version::None, &v("250101T000000")),
        Err(EngineError::Core(CoreError::UnknownVersion { .. }))
    ));
    assert!(m.build_plan(&Version::Init, &Version::Init).unwrap().is_empty());
}
