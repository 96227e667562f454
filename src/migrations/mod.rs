//! Migration files for the options table.
//!
//! Migrations live on disk as `<timestamp>_<name>/up.sql` + `down.sql`
//! directories. [`generate`] writes a new timestamped create-table
//! migration; [`load`] discovers whatever is present; [`Manager`] applies
//! pending migrations against a database.

pub mod manager;

pub use manager::{Manager, Status};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

/// A single migration with up and down SQL.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub up_sql: String,
    pub down_sql: String,
}

/// Schema definition for the options table.
///
/// The accessor reads and writes `option_key`/`option_value`, so the
/// generated schema uses the same column names.
pub fn options_table_up_sql(table: &str) -> String {
    format!(
        "CREATE TABLE {table} (\n\
        \x20   id INTEGER PRIMARY KEY AUTOINCREMENT,\n\
        \x20   option_key TEXT NOT NULL UNIQUE,\n\
        \x20   option_value TEXT NOT NULL,\n\
        \x20   created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,\n\
        \x20   updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP\n\
        );\n"
    )
}

pub fn options_table_down_sql(table: &str) -> String {
    format!("DROP TABLE {table};\n")
}

/// Write a timestamped create-table migration for `table` into `dir`.
///
/// Returns the migration directory. Refuses to overwrite: fails if a
/// migration with the same timestamp already exists.
pub fn generate(dir: &Path, table: &str) -> Result<PathBuf> {
    let version = Local::now().format("%Y_%m_%d_%H%M%S").to_string();
    generate_at(dir, table, &version)
}

fn generate_at(dir: &Path, table: &str, version: &str) -> Result<PathBuf> {
    if !crate::store::is_valid_table_name(table) {
        anyhow::bail!("Invalid options table name: '{}'", table);
    }

    let migration_dir = dir.join(format!("{}_create_{}_table", version, table));
    if migration_dir.exists() {
        anyhow::bail!("Migration already exists: {:?}", migration_dir);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create migrations directory: {:?}", dir))?;
    fs::create_dir(&migration_dir)
        .with_context(|| format!("Failed to create migration directory: {:?}", migration_dir))?;

    fs::write(migration_dir.join("up.sql"), options_table_up_sql(table))
        .with_context(|| format!("Failed to write up.sql in {:?}", migration_dir))?;
    fs::write(migration_dir.join("down.sql"), options_table_down_sql(table))
        .with_context(|| format!("Failed to write down.sql in {:?}", migration_dir))?;

    log::info!("Generated migration: {:?}", migration_dir);
    Ok(migration_dir)
}

/// Discover migrations in `dir`, keyed and ordered by version.
///
/// A missing directory is treated as empty.
pub fn load(dir: &Path) -> Result<BTreeMap<i64, Migration>> {
    let mut migrations = BTreeMap::new();

    if !dir.exists() {
        return Ok(migrations);
    }

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read migrations directory: {:?}", dir))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let dir_name = entry.file_name();
        let dir_name = dir_name.to_str().context("Invalid migration directory name")?;

        let (version, name) = parse_dir_name(dir_name).with_context(|| {
            format!(
                "Invalid migration directory format: {}. Expected format: TIMESTAMP_name",
                dir_name
            )
        })?;

        let up_sql = fs::read_to_string(entry.path().join("up.sql"))
            .with_context(|| format!("Missing up.sql in migration {}", dir_name))?;
        let down_sql = fs::read_to_string(entry.path().join("down.sql"))
            .with_context(|| format!("Missing down.sql in migration {}", dir_name))?;

        let previous = migrations.insert(
            version,
            Migration {
                version,
                name,
                up_sql,
                down_sql,
            },
        );
        if previous.is_some() {
            anyhow::bail!("Duplicate migration version: {}", version);
        }
    }

    Ok(migrations)
}

/// Split `2014_10_08_123456_create_options_table` into a numeric version
/// (the timestamp digits, concatenated) and a name.
fn parse_dir_name(dir_name: &str) -> Result<(i64, String)> {
    let mut version = String::new();
    let mut rest = Vec::new();

    for part in dir_name.split('_') {
        if rest.is_empty() && !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()) {
            version.push_str(part);
        } else {
            rest.push(part);
        }
    }

    if version.is_empty() || rest.is_empty() {
        anyhow::bail!("No version prefix in migration directory name");
    }

    let version: i64 = version
        .parse()
        .context("Migration version out of range")?;

    Ok((version, rest.join("_")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_sql_uses_accessor_columns() {
        let sql = options_table_up_sql("options");

        assert!(sql.contains("CREATE TABLE options"));
        assert!(sql.contains("option_key TEXT NOT NULL UNIQUE"));
        assert!(sql.contains("option_value TEXT NOT NULL"));
        assert!(sql.contains("created_at"));
        assert!(sql.contains("updated_at"));
    }

    #[test]
    fn test_generate_writes_up_and_down() {
        let dir = tempfile::tempdir().unwrap();

        let path = generate_at(dir.path(), "options", "2014_10_08_123456").unwrap();
        assert_eq!(
            path.file_name().unwrap(),
            "2014_10_08_123456_create_options_table"
        );

        let up = fs::read_to_string(path.join("up.sql")).unwrap();
        let down = fs::read_to_string(path.join("down.sql")).unwrap();
        assert!(up.contains("CREATE TABLE options"));
        assert_eq!(down, "DROP TABLE options;\n");
    }

    #[test]
    fn test_generate_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();

        generate_at(dir.path(), "options", "2014_10_08_123456").unwrap();
        let err = generate_at(dir.path(), "options", "2014_10_08_123456").unwrap_err();

        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_generate_rejects_invalid_table_name() {
        let dir = tempfile::tempdir().unwrap();

        let err = generate_at(dir.path(), "my-options", "2014_10_08_123456").unwrap_err();
        assert!(err.to_string().contains("Invalid options table name"));
    }

    #[test]
    fn test_load_roundtrips_generated_migration() {
        let dir = tempfile::tempdir().unwrap();
        generate_at(dir.path(), "options", "2014_10_08_123456").unwrap();

        let migrations = load(dir.path()).unwrap();
        assert_eq!(migrations.len(), 1);

        let migration = migrations.values().next().unwrap();
        assert_eq!(migration.version, 20141008123456);
        assert_eq!(migration.name, "create_options_table");
        assert!(migration.up_sql.contains("CREATE TABLE options"));
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();

        let migrations = load(&dir.path().join("nope")).unwrap();
        assert!(migrations.is_empty());
    }

    #[test]
    fn test_load_orders_by_version() {
        let dir = tempfile::tempdir().unwrap();
        generate_at(dir.path(), "second", "2015_01_01_000000").unwrap();
        generate_at(dir.path(), "first", "2014_01_01_000000").unwrap();

        let versions: Vec<i64> = load(dir.path()).unwrap().into_keys().collect();
        assert_eq!(versions, vec![20140101000000, 20150101000000]);
    }

    #[test]
    fn test_parse_dir_name() {
        let (version, name) = parse_dir_name("2014_10_08_123456_create_options_table").unwrap();
        assert_eq!(version, 20141008123456);
        assert_eq!(name, "create_options_table");

        assert!(parse_dir_name("no_version_here").is_err());
        assert!(parse_dir_name("123456").is_err());
    }
}
