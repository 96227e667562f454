use anyhow::Result;
use clap::Parser;
use log::info;

use options_cli::cli::app::Commands;
use options_cli::cli::{Cli, commands};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    info!("Starting options-cli");

    match cli.command {
        Commands::Migration(args) => commands::migration_command(args).await?,
        Commands::Option(args) => commands::option_command(args).await?,
    }

    Ok(())
}
