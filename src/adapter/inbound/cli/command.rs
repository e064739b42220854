//! Command-line interface definitions.
//!
//! Defines the CLI structure for xdedupe using `clap`: scripted replays of
//! a simulated feed, maintenance of the persisted seen store, and
//! configuration inspection.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Seen-item tracking for scrolling feeds
#[derive(Parser, Debug)]
#[command(name = "xdedupe")]
#[command(version, about)]
pub struct Cli {
    /// Path to the configuration file [default: ~/.xdedupe/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the xdedupe CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the engine through a scripted feed session
    Replay(ReplayArgs),

    /// Inspect and maintain the persisted seen store
    #[command(subcommand)]
    Seen(SeenCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for the `replay` subcommand.
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Path to the JSON replay script.
    pub script: PathBuf,

    /// Use a volatile in-memory store instead of the configured one.
    #[arg(long)]
    pub ephemeral: bool,
}

/// Subcommands for `xdedupe seen`.
#[derive(Subcommand, Debug)]
pub enum SeenCommand {
    /// List stored records, earliest expiry first.
    List,
    /// Delete expired records.
    Prune,
    /// Delete the record for one item id.
    Forget {
        /// Item id to forget.
        id: String,
    },
    /// Delete every record.
    Clear,
}

/// Subcommands for `xdedupe config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate a configuration file for correctness.
    Validate,
}
