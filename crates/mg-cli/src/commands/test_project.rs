//! Throwaway projects for command tests

use crate::cli::GlobalArgs;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub(crate) const SECOND: &str = "200101T000000";

fn write_sql(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), format!("-- command test script, padded\n{body}\n")).unwrap();
}

/// Project with an init migration and a two-part migration, backed by a
/// DuckDB file inside the project directory.
pub(crate) fn project() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("migrate.yml"),
        "database:\n  path: test.duckdb\nmigrations_path: migrations\n",
    )
    .unwrap();

    let migrations = tmp.path().join("migrations");
    let init = migrations.join("000000T000000-init");
    fs::create_dir_all(&init).unwrap();
    write_sql(&init, "up.sql", "CREATE TABLE users (id INTEGER);");
    write_sql(&init, "down.sql", "DROP TABLE users;");

    let second = migrations.join(format!("{SECOND}-profiles"));
    fs::create_dir_all(&second).unwrap();
    write_sql(
        &second,
        "state.sql",
        "SELECT count(*) FROM information_schema.tables \
         WHERE table_name IN ('profiles', 'avatars');",
    );
    write_sql(&second, "1.up.sql", "CREATE TABLE profiles (id INTEGER);");
    write_sql(&second, "1.down.sql", "DROP TABLE profiles;");
    write_sql(&second, "2.up.sql", "CREATE TABLE avatars (id INTEGER);");
    write_sql(&second, "2.down.sql", "DROP TABLE avatars;");
    tmp
}

/// Add a one-part dev migration to `project`.
pub(crate) fn add_dev(project: &Path) {
    let dev = project.join("migrations").join("991231T235959-local");
    fs::create_dir_all(&dev).unwrap();
    write_sql(
        &dev,
        "state.sql",
        "SELECT count(*) FROM information_schema.tables WHERE table_name = 'fixtures';",
    );
    write_sql(&dev, "1.up.sql", "CREATE TABLE fixtures (id INTEGER);");
    write_sql(&dev, "1.down.sql", "DROP TABLE fixtures;");
}

pub(crate) fn global(project: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project.to_path_buf(),
        config: None,
        database: None,
        dev: false,
    }
}
