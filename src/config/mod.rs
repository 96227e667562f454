//! Settings for the CLI: options table name, migrations directory and
//! database location.
//!
//! Settings are read from `config.toml` in the platform config directory.
//! A missing file is not an error; every setting has a default and command
//! line flags override whatever is loaded.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name of the options table.
    pub table_name: String,
    /// Where generated migrations are written to and applied from.
    pub migrations_dir: PathBuf,
    /// Database file; defaults into the config directory when unset.
    pub database_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_name: crate::store::DEFAULT_TABLE.to_string(),
            migrations_dir: PathBuf::from("migrations"),
            database_path: None,
        }
    }
}

impl Settings {
    /// Platform config directory for this tool.
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("options-cli")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".options-cli")
        };

        Ok(dir)
    }

    /// Load settings from the config file, falling back to defaults when
    /// the file is absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_dir()?.join("config.toml");
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        log::debug!("Loading config from: {:?}", path);
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Resolve the database path, defaulting into the config directory.
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("options.db")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.table_name, "options");
        assert_eq!(settings.migrations_dir, PathBuf::from("migrations"));
        assert!(settings.database_path.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let settings: Settings = toml::from_str(r#"table_name = "app_settings""#).unwrap();

        assert_eq!(settings.table_name, "app_settings");
        assert_eq!(settings.migrations_dir, PathBuf::from("migrations"));
    }

    #[test]
    fn test_parse_full_config() {
        let settings: Settings = toml::from_str(
            r#"
            table_name = "site_options"
            migrations_dir = "db/migrations"
            database_path = "/tmp/site.db"
            "#,
        )
        .unwrap();

        assert_eq!(settings.table_name, "site_options");
        assert_eq!(settings.migrations_dir, PathBuf::from("db/migrations"));
        assert_eq!(
            settings.resolve_database_path().unwrap(),
            PathBuf::from("/tmp/site.db")
        );
    }
}
