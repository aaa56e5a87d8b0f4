use super::*;

fn code(name: &str) -> MigrationCode {
    MigrationCode::try_new(name).unwrap()
}

fn part(n: u32) -> Part {
    Part::new(
        ScriptRef::inline(format!("{n}.up.sql"), format!("CREATE TABLE t{n} (id INT);")),
        ScriptRef::inline(format!("{n}.down.sql"), format!("DROP TABLE t{n};")),
    )
}

#[test]
fn test_baseline_has_one_part_and_no_state_query() {
    let m = Migration::baseline(code("init"), part(1));
    assert!(m.is_baseline());
    assert_eq!(m.max_part(), 1);
    assert!(m.state_script().is_none());
    assert_eq!(m.display_code(), "(init)");
}

#[test]
fn test_multi_part_numbering_starts_at_one() {
    let m = Migration::multi_part(
        Version::parse("200101T000000").unwrap(),
        code("add_users"),
        ScriptRef::inline("state.sql", "SELECT 0"),
        vec![part(1), part(2), part(3)],
    )
    .unwrap();
    assert!(!m.is_baseline());
    assert_eq!(m.part_numbers().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(m.max_part(), 3);
    assert_eq!(m.part_count(), 3);
    assert_eq!(m.display_code(), "add_users");
    assert!(m.part(4).is_none());
}

#[test]
fn test_multi_part_rejects_empty_and_sentinels() {
    let state = ScriptRef::inline("state.sql", "SELECT 0");
    assert!(Migration::multi_part(
        Version::parse("200101T000000").unwrap(),
        code("x"),
        state.clone(),
        vec![]
    )
    .is_err());
    assert!(Migration::multi_part(Version::Init, code("x"), state, vec![part(1)]).is_err());
}

#[test]
fn test_part_script_by_direction() {
    let p = part(2);
    assert_eq!(p.script(Direction::Up).describe(), "2.up.sql");
    assert_eq!(p.script(Direction::Down).describe(), "2.down.sql");
}

#[test]
fn test_load_rejects_blank_inline_script() {
    let blank = ScriptRef::inline("blank.sql", "   \n");
    assert!(matches!(blank.load(), Err(CoreError::EmptyScript { .. })));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = ScriptRef::File(dir.path().join("nope.sql"));
    assert!(matches!(missing.load(), Err(CoreError::EmptyScript { .. })));
}

#[test]
fn test_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("1.up.sql");
    std::fs::write(&path, "CREATE TABLE a (id INT);").unwrap();
    assert_eq!(
        ScriptRef::File(path).load().unwrap(),
        "CREATE TABLE a (id INT);"
    );
}
