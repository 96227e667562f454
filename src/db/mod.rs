//! SQLite connection helpers.

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Open the database at `path`, creating the file and its parent directory
/// if needed.
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
            log::info!("Created database directory: {:?}", parent);
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePool::connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {:?}", path))?;

    log::debug!("Connected to database: {:?}", path);
    Ok(pool)
}

/// In-memory database, used by tests.
///
/// Capped at one connection: every `:memory:` connection is its own
/// database, so a larger pool would hand out empty databases.
pub async fn connect_memory() -> Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .context("Failed to open in-memory database")
}
