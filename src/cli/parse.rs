//! CLI parse: clap types for quizwheel. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// quizwheel - spin a wheel over quiz questions aggregated from HTTP sources
#[derive(Parser)]
#[command(name = "quizwheel")]
#[command(version)]
#[command(about = "Aggregate quiz questions from HTTP sources and pick unread ones at random")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage question source endpoints
    Endpoints {
        #[command(subcommand)]
        command: EndpointCommands,
    },
    /// Load the collection: from the store if populated, from the endpoints otherwise
    Load,
    /// Re-fetch the collection from the configured endpoints
    Refresh,
    /// List questions
    List {
        /// Show only unread questions
        #[arg(long)]
        unread: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Spin the wheel and mark the picked question read
    Spin {
        /// Seed the random source for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the progress animation
        #[arg(long)]
        quick: bool,
    },
    /// Delete every stored question
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum EndpointCommands {
    /// Show configured endpoints
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Replace the endpoint list and load from it (clears stored questions)
    Set {
        /// Endpoint URLs, in fetch order
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Remove every endpoint (clears stored questions)
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}
