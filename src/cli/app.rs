use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "options-cli")]
#[command(about = "A key/value options store backed by SQLite")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Migration management for the options table
    Migration(MigrationCommands),
    /// Read and write options
    Option(OptionCommands),
}

#[derive(Args)]
pub struct MigrationCommands {
    #[command(subcommand)]
    pub command: MigrationSubcommands,
}

#[derive(Subcommand)]
pub enum MigrationSubcommands {
    /// Create a migration that creates the options table
    Create {
        /// Options table name
        #[arg(long)]
        table: Option<String>,
        /// Directory the migration is written to
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Apply pending migrations to the database
    Apply {
        /// Directory migrations are read from
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Database file
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Show applied and pending migrations
    Status {
        /// Directory migrations are read from
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Database file
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct OptionCommands {
    #[command(subcommand)]
    pub command: OptionSubcommands,
}

#[derive(Subcommand)]
pub enum OptionSubcommands {
    /// Get the value of an option
    Get {
        /// Option key
        key: String,
    },
    /// Check whether an option exists
    Has {
        /// Option key
        key: String,
    },
    /// Add a new option
    Add {
        /// Option key
        key: String,
        /// Option value
        value: String,
    },
    /// Update the value of an existing option
    Update {
        /// Option key
        key: String,
        /// New option value
        value: String,
    },
    /// Delete an option
    Delete {
        /// Option key
        key: String,
    },
    /// List all options
    List,
}
