use super::*;
use crate::commands::test_project::{add_dev, global, project};
use mg_core::Version;
use serial_test::serial;
use std::fs;

#[test]
fn test_loads_config_and_registry() {
    let tmp = project();
    let ctx = RuntimeContext::new(&global(tmp.path())).unwrap();
    assert_eq!(ctx.registry.len(), 2);
    assert_eq!(
        ctx.database_path,
        tmp.path().join("test.duckdb").display().to_string()
    );
}

#[test]
fn test_database_override() {
    let tmp = project();
    let mut args = global(tmp.path());
    args.database = Some(":memory:".to_string());
    let ctx = RuntimeContext::new(&args).unwrap();
    assert_eq!(ctx.database_path, ":memory:");
    ctx.into_migrator(mg_engine::AutoConfirm(false)).unwrap();
    assert!(!tmp.path().join("test.duckdb").exists());
}

#[test]
fn test_explicit_config_path() {
    let tmp = project();
    let alt = tmp.path().join("alt.yml");
    fs::write(&alt, "migrations_path: migrations\ninclude_dev: true\n").unwrap();
    add_dev(tmp.path());

    let mut args = global(tmp.path());
    args.config = Some(alt);
    let ctx = RuntimeContext::new(&args).unwrap();
    assert!(ctx.registry.contains(&Version::Dev));
    assert!(ctx.database_path.ends_with("migrate.duckdb"));
}

#[test]
fn test_invalid_migration_fails_before_opening_database() {
    let tmp = project();
    fs::create_dir(tmp.path().join("migrations").join("not-a-version")).unwrap();
    assert!(RuntimeContext::new(&global(tmp.path())).is_err());
    assert!(!tmp.path().join("test.duckdb").exists());
}

#[test]
#[serial]
fn test_app_env_dev_includes_dev_migration() {
    let tmp = project();
    add_dev(tmp.path());

    std::env::set_var("APP_ENV", "dev");
    let with_env = RuntimeContext::new(&global(tmp.path()));
    std::env::remove_var("APP_ENV");

    assert!(with_env.unwrap().registry.contains(&Version::Dev));
    let without = RuntimeContext::new(&global(tmp.path())).unwrap();
    assert!(!without.registry.contains(&Version::Dev));
}
