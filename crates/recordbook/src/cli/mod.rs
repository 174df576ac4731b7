//! Command-line interface for recordbook.
//!
//! This module provides the CLI structure for the `recbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{AirlineCommand, ConfigCommand, ListCommand, RecordCommand, StatusCommand};

/// recbook - Keep client, airline and flight records
///
/// Records live in plain JSON files, one per record type. Field values are
/// given as `-f "Key=Value"` using the field names found in those files.
#[derive(Debug, Parser)]
#[command(name = "recbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for record changes, -vv for file access)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage client records
    #[command(subcommand)]
    Client(RecordCommand),

    /// Manage airline records
    #[command(subcommand)]
    Airline(AirlineCommand),

    /// Manage flight records
    #[command(subcommand)]
    Flight(RecordCommand),

    /// Show the state of every record file
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
