//! Handlers for the `option` subcommands.

use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::cli::app::{OptionCommands, OptionSubcommands};
use crate::config::Settings;
use crate::db;
use crate::store::OptionsStore;

pub async fn option_command(args: OptionCommands) -> Result<()> {
    let settings = Settings::load()?;
    let pool = db::connect(&settings.resolve_database_path()?).await?;
    let store = OptionsStore::with_table(pool, settings.table_name.clone())?;

    match args.command {
        OptionSubcommands::Get { key } => {
            info!("Getting option: {}", key);
            match store.get(&key).await? {
                Some(value) => println!("{}", value),
                None => println!("(not set)"),
            }
        }
        OptionSubcommands::Has { key } => {
            println!("{}", store.has(&key).await?);
        }
        OptionSubcommands::Add { key, value } => {
            store.add(&key, &value).await?;
            println!("{} Added option '{}'", "✓".bright_green().bold(), key);
        }
        OptionSubcommands::Update { key, value } => {
            if store.update(&key, &value).await? {
                println!("{} Updated option '{}'", "✓".bright_green().bold(), key);
            } else {
                println!("Option '{}' already has that value.", key);
            }
        }
        OptionSubcommands::Delete { key } => {
            store.delete(&key).await?;
            println!("{} Deleted option '{}'", "✓".bright_green().bold(), key);
        }
        OptionSubcommands::List => {
            let options = store.list().await?;
            if options.is_empty() {
                println!("No options set.");
            } else {
                for (key, value) in options {
                    println!("{} = {}", key.cyan(), value);
                }
            }
        }
    }

    Ok(())
}
