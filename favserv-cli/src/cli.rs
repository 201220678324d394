//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// `favserv` command-line interface for managing favorite game servers
#[derive(Parser)]
#[command(name = "favserv-cli")]
#[command(author, version, about = "favserv command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List all favorite servers
    #[command(about = "List all favorite servers")]
    List {
        /// Output format for the server list
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Show details of a favorite server
    #[command(about = "Show details of a favorite server")]
    Show {
        /// Server name or ID
        name: String,
    },

    /// Add a new favorite server
    #[command(about = "Add a new favorite server")]
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Hostname or IP address
        #[arg(short = 'H', long)]
        host: String,

        /// Game port (default: 2456)
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,

        /// Saved server password
        #[arg(long)]
        password: Option<String>,

        /// Identity to auto-select when connecting
        #[arg(short, long)]
        identity: Option<String>,
    },

    /// Update an existing favorite server
    #[command(about = "Update an existing favorite server")]
    Update {
        /// Server name or ID
        name: String,

        /// New display name
        #[arg(short, long)]
        new_name: Option<String>,

        /// New hostname or IP address
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// New game port
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,

        /// New saved password
        #[arg(long, conflicts_with = "clear_password")]
        password: Option<String>,

        /// Remove the saved password
        #[arg(long)]
        clear_password: bool,

        /// New preferred identity (empty string to always ask)
        #[arg(short, long)]
        identity: Option<String>,
    },

    /// Delete a favorite server
    #[command(about = "Delete a favorite server")]
    Delete {
        /// Server name or ID
        name: String,
    },

    /// Connect to a favorite server
    #[command(about = "Resolve a favorite server and launch the game against it")]
    Connect {
        /// Server name or ID
        name: String,

        /// Resolve and print what would be launched without launching it
        #[arg(long)]
        dry_run: bool,
    },

    /// List identities available for auto-selection
    #[command(about = "List identities found in the save directories")]
    Characters {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Show the settings in effect
    #[command(about = "Show the settings in effect, defaults included")]
    Settings,

    /// Generate shell completions
    #[command(about = "Generate shell completions")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Output format for listing commands
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    Table,
    /// Output as JSON
    Json,
    /// Output as CSV
    Csv,
}
