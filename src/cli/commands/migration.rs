//! Handlers for the `migration` subcommands.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input};
use log::info;

use crate::cli::app::{MigrationCommands, MigrationSubcommands};
use crate::config::Settings;
use crate::db;
use crate::migrations;

pub async fn migration_command(args: MigrationCommands) -> Result<()> {
    let settings = Settings::load()?;

    match args.command {
        MigrationSubcommands::Create { table, dir, yes } => {
            create_command(&settings, table, dir, yes)
        }
        MigrationSubcommands::Apply { dir, database } => {
            apply_command(&settings, dir, database).await
        }
        MigrationSubcommands::Status { dir, database } => {
            status_command(&settings, dir, database).await
        }
    }
}

/// Create a timestamped migration for the options table.
///
/// File-system failures are reported as a user-facing message, not an error
/// exit.
fn create_command(
    settings: &Settings,
    table: Option<String>,
    dir: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let table = match table {
        Some(table) => table,
        None => Input::new()
            .with_prompt("Options table name")
            .default(settings.table_name.clone())
            .interact_text()?,
    };
    let dir = dir.unwrap_or_else(|| settings.migrations_dir.clone());

    println!();
    println!("Table: {}", table.cyan());
    println!(
        "A migration that creates the {} table will be created in the {} directory",
        table,
        dir.display()
    );
    println!();

    if !yes {
        let proceed = Confirm::new()
            .with_prompt("Proceed with the migration creation?")
            .default(true)
            .interact()?;

        if !proceed {
            println!("{} Cancelled.", "✗".bright_red().bold());
            return Ok(());
        }
        println!();
    }

    info!("Creating migration for table: {}", table);
    match migrations::generate(&dir, &table) {
        Ok(path) => {
            println!(
                "{} Migration created: {}",
                "✓".bright_green().bold(),
                path.display()
            );
        }
        Err(e) => {
            println!(
                "{} Couldn't create migration: {:#}",
                "✗".bright_red().bold(),
                e
            );
            println!(
                "Check the write permissions of the {} directory.",
                dir.display()
            );
        }
    }

    Ok(())
}

/// Apply pending migrations from the migrations directory.
async fn apply_command(
    settings: &Settings,
    dir: Option<PathBuf>,
    database: Option<PathBuf>,
) -> Result<()> {
    let dir = dir.unwrap_or_else(|| settings.migrations_dir.clone());
    let db_path = match database {
        Some(path) => path,
        None => settings.resolve_database_path()?,
    };

    let pool = db::connect(&db_path).await?;
    let manager = migrations::Manager::new(&pool, dir);

    let count = manager.apply_pending().await?;
    if count == 0 {
        println!("Nothing to apply, database is up to date.");
    } else {
        println!(
            "{} Applied {} migration{}.",
            "✓".bright_green().bold(),
            count,
            if count == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

/// Show applied and pending migrations.
async fn status_command(
    settings: &Settings,
    dir: Option<PathBuf>,
    database: Option<PathBuf>,
) -> Result<()> {
    let dir = dir.unwrap_or_else(|| settings.migrations_dir.clone());
    let db_path = match database {
        Some(path) => path,
        None => settings.resolve_database_path()?,
    };

    let pool = db::connect(&db_path).await?;
    let manager = migrations::Manager::new(&pool, dir);

    manager.status().await?.print();
    Ok(())
}
