//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "netscribe",
    version,
    about = "Automated network documentation for UniFi-style controllers",
    long_about = "Connects to one or more network controllers, collects their \
                  configuration and state, and writes timestamped Markdown/JSON \
                  documentation with backup rotation."
)]
pub struct Cli {
    /// Path to the config file (defaults to the platform config dir).
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate documentation now, then daily at the configured time.
    Run,

    /// Generate documentation once and exit.
    Once,

    /// Report the outcome of the last recorded run.
    Health,

    /// Probe connectivity and authentication for each controller.
    Check,
}
