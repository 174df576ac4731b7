//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Actions shared by every record type.
///
/// Identifiers are taken as text and converted after parsing, so a
/// non-numeric identifier gets the same message as any other malformed
/// input.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Add a record under the next free ID
    Add {
        /// A field value, e.g. -f "Zip Code=60601" (repeatable)
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", required = true)]
        fields: Vec<String>,
    },

    /// Show one record
    Show {
        /// Record ID
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Change some fields of a record
    Update {
        /// Record ID
        id: String,

        /// A field value to overwrite (repeatable)
        #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", required = true)]
        fields: Vec<String>,
    },

    /// Delete a record
    Delete {
        /// Record ID
        id: String,
    },

    /// List all records
    List(ListCommand),
}

/// Airline commands: the shared actions plus lookup by name.
#[derive(Debug, Subcommand)]
pub enum AirlineCommand {
    #[command(flatten)]
    #[allow(missing_docs)]
    Record(RecordCommand),

    /// Find an airline by company name, ignoring case
    Find {
        /// Company name
        name: String,
    },
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
