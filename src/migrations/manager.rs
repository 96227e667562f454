//! Applies generated migrations and tracks what has been applied.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use sqlx::SqlitePool;

use super::{Migration, load};

/// Runs pending migrations from a directory against a database.
///
/// Applied migrations are recorded in a `schema_migrations` table keyed by
/// version. Only up migrations are ever executed; the generated down SQL is
/// kept on disk for reference.
pub struct Manager<'a> {
    pool: &'a SqlitePool,
    dir: PathBuf,
}

impl<'a> Manager<'a> {
    pub fn new(pool: &'a SqlitePool, dir: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            dir: dir.into(),
        }
    }

    /// Create the migration tracking table if needed.
    async fn init(&self) -> Result<()> {
        debug!("Initializing migration tracking table");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(self.pool)
        .await
        .context("Failed to create schema_migrations table")?;

        Ok(())
    }

    /// Apply all pending migrations, returning how many ran.
    pub async fn apply_pending(&self) -> Result<usize> {
        self.init().await?;

        let pending = self.pending().await?;
        if pending.is_empty() {
            info!("No pending migrations");
            return Ok(0);
        }

        info!("Running {} pending migrations", pending.len());
        let count = pending.len();
        for migration in pending {
            self.apply(&migration).await?;
        }

        Ok(count)
    }

    /// Apply a single migration inside a transaction.
    async fn apply(&self, migration: &Migration) -> Result<()> {
        info!("Applying migration {} '{}'", migration.version, migration.name);
        debug!("Executing SQL:\n{}", migration.up_sql);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start migration transaction")?;

        sqlx::query(&migration.up_sql)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to execute migration {} up SQL", migration.version))?;

        sqlx::query("INSERT INTO schema_migrations (version, name) VALUES (?, ?)")
            .bind(migration.version)
            .bind(&migration.name)
            .execute(&mut *tx)
            .await
            .context("Failed to record migration")?;

        tx.commit()
            .await
            .context("Failed to commit migration transaction")?;

        info!("Migration {} applied", migration.version);
        Ok(())
    }

    async fn applied_versions(&self) -> Result<Vec<i64>> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT version FROM schema_migrations ORDER BY version")
                .fetch_all(self.pool)
                .await
                .context("Failed to list applied migrations")?;

        Ok(rows.into_iter().map(|(version,)| version).collect())
    }

    /// Migrations on disk that have not been recorded as applied.
    async fn pending(&self) -> Result<Vec<Migration>> {
        let available = load(&self.dir)?;
        let applied = self.applied_versions().await?;

        Ok(available
            .into_values()
            .filter(|m| !applied.contains(&m.version))
            .collect())
    }

    /// Applied/pending summary for `migration status`.
    pub async fn status(&self) -> Result<Status> {
        self.init().await?;

        let applied: Vec<AppliedMigration> = sqlx::query_as(
            "SELECT version, name, applied_at FROM schema_migrations ORDER BY version",
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list applied migrations")?;

        let pending = self.pending().await?;

        Ok(Status { applied, pending })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// A migration recorded in the tracking table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
}

/// Migration status information.
#[derive(Debug)]
pub struct Status {
    pub applied: Vec<AppliedMigration>,
    pub pending: Vec<Migration>,
}

impl Status {
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn print(&self) {
        println!("Migration status:");
        println!("  Applied: {}", self.applied.len());
        println!("  Pending: {}", self.pending.len());
        println!("  Up to date: {}", self.is_up_to_date());

        if !self.applied.is_empty() {
            println!("\nApplied migrations:");
            for migration in &self.applied {
                println!(
                    "  ✓ {} {} ({})",
                    migration.version,
                    migration.name,
                    migration.applied_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }

        if !self.pending.is_empty() {
            println!("\nPending migrations:");
            for migration in &self.pending {
                println!("  ○ {} {}", migration.version, migration.name);
            }
        }
    }
}
