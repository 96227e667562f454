//! SQLite-backed key/value options store with a migration generator CLI.
//!
//! The library surface is [`store::OptionsStore`], a thin CRUD accessor over
//! a two-column options table. The binary wraps it with commands to generate
//! and apply schema migrations for that table and to read and write options
//! from the command line.

pub mod cli;
pub mod config;
pub mod db;
pub mod migrations;
pub mod store;
