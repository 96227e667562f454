//! Database-backed storage for options.
//!
//! All read and write access to the options table goes through
//! [`OptionsStore`]. The table enforces key uniqueness; the store translates
//! constraint violations and missing keys into typed errors.

mod error;

pub use error::{Error, Result};

use log::debug;
use sqlx::SqlitePool;

/// Table used when none is configured.
pub const DEFAULT_TABLE: &str = "options";

/// Key/value accessor over a single options table.
///
/// Keys are unique and immutable once created; values are opaque strings.
#[derive(Debug)]
pub struct OptionsStore {
    pool: SqlitePool,
    table: String,
}

impl OptionsStore {
    /// Create a store over the default `options` table.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Create a store over a custom table.
    ///
    /// Table names cannot be bound as SQL parameters, so the name is spliced
    /// into each statement and must be a plain identifier.
    pub fn with_table(pool: SqlitePool, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        if !is_valid_table_name(&table) {
            return Err(Error::InvalidTableName(table));
        }
        Ok(Self { pool, table })
    }

    /// The table this store reads and writes.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Get the value stored for `key`, or `None` if no such option exists.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar(&format!(
            "SELECT option_value FROM {} WHERE option_key = ?",
            self.table
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Check whether an option with `key` exists, without fetching its value.
    pub async fn has(&self, key: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE option_key = ?",
            self.table
        ))
        .bind(key)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Insert a new option.
    ///
    /// Fails with [`Error::DuplicateKey`] if `key` is already stored; the
    /// existing value is left untouched.
    pub async fn add(&self, key: &str, value: &str) -> Result<bool> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (option_key, option_value) VALUES (?, ?)",
            self.table
        ))
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!("Added option: {} = {}", key, value);
                Ok(true)
            }
            Err(e) if is_unique_violation(&e) => Err(Error::DuplicateKey {
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Update the value stored for `key`.
    ///
    /// Returns `Ok(true)` when the row changed and `Ok(false)` when the
    /// stored value already equals `value`. Fails with
    /// [`Error::NonExistentOption`] when `key` was never added.
    pub async fn update(&self, key: &str, value: &str) -> Result<bool> {
        // The value guard keeps a same-value update at zero rows affected,
        // so "no change needed" and "no such key" stay distinguishable.
        let result = sqlx::query(&format!(
            "UPDATE {} SET option_value = ?2, updated_at = CURRENT_TIMESTAMP \
             WHERE option_key = ?1 AND option_value <> ?2",
            self.table
        ))
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Existence recheck is not atomic with the UPDATE above; a
            // concurrent delete can slip in between. The backend runs
            // without a wrapping transaction here.
            if !self.has(key).await? {
                return Err(Error::NonExistentOption {
                    key: key.to_string(),
                });
            }
            return Ok(false);
        }

        debug!("Updated option: {} = {}", key, value);
        Ok(result.rows_affected() == 1)
    }

    /// Delete the option stored for `key`.
    ///
    /// Returns `Ok(true)` when a row was removed. Fails with
    /// [`Error::NonExistentOption`] when `key` was never added or was
    /// already deleted.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE option_key = ?",
            self.table
        ))
        .bind(key)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            if !self.has(key).await? {
                return Err(Error::NonExistentOption {
                    key: key.to_string(),
                });
            }
            return Ok(false);
        }

        debug!("Deleted option: {}", key);
        Ok(true)
    }

    /// All stored options, ordered by key.
    pub async fn list(&self) -> Result<Vec<(String, String)>> {
        let rows: Vec<(String, String)> = sqlx::query_as(&format!(
            "SELECT option_key, option_value FROM {} ORDER BY option_key",
            self.table
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Uniqueness violations are detected structurally from the backend error,
/// never by matching message text.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

pub(crate) fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
