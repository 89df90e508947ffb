//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Flowdeck - live traffic-inspection console core
#[derive(Parser, Debug)]
#[command(
    name = "flowdeck",
    author,
    version,
    about = "Live traffic-inspection console",
    long_about = "A console core for inspecting intercepted proxy traffic.\n\n\
                  Connects to a proxy event stream, reconciles flows and event-log \n\
                  entries into consistent in-memory views, and reports traffic as \n\
                  it arrives."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FLOWDECK_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "FLOWDECK_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the console session against a proxy event stream
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "flowdeck.toml", env = "FLOWDECK_CONFIG")]
    pub config: PathBuf,

    /// Override the stream host from configuration
    #[arg(long, env = "FLOWDECK_HOST")]
    pub host: Option<String>,

    /// Override the stream port from configuration
    #[arg(long, env = "FLOWDECK_PORT")]
    pub port: Option<u16>,

    /// Maximum number of stream messages to process (0 = unlimited)
    #[arg(long, default_value = "0", env = "FLOWDECK_MAX_MESSAGES")]
    pub max_messages: u64,

    /// Session timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "FLOWDECK_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without connecting
    #[arg(long)]
    pub dry_run: bool,

    /// Channel buffer size for the transport event queue
    #[arg(long, default_value = "100", env = "FLOWDECK_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "FLOWDECK_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "flowdeck.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "flowdeck.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
