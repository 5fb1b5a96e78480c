//! CLI error types with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const OUTPUT: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("configuration error")]
    #[diagnostic(
        code(netscribe::config),
        help(
            "Check the config file, or describe a single controller via\n\
             NETSCRIBE_URL, NETSCRIBE_USERNAME, and NETSCRIBE_PASSWORD."
        )
    )]
    Config(#[from] netscribe_config::ConfigError),

    #[error("could not prepare output directory")]
    #[diagnostic(
        code(netscribe::output),
        help("Check that the output directory is writable.")
    )]
    Output(#[from] netscribe_core::OutputError),

    #[error("documentation failed for {failed} of {total} controller(s)")]
    #[diagnostic(
        code(netscribe::generation_failed),
        help("Re-run with -v for per-controller details, or try `netscribe check`.")
    )]
    GenerationFailed { failed: usize, total: usize },

    #[error("last run was unhealthy: no controller was documented")]
    #[diagnostic(
        code(netscribe::unhealthy),
        help("Inspect generation-status.json in the output directory.")
    )]
    Unhealthy,

    #[error("no controller answered the connectivity probe")]
    #[diagnostic(
        code(netscribe::unreachable),
        help("Verify controller URLs and credentials, then retry `netscribe check`.")
    )]
    AllProbesFailed,
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::CONFIG,
            Self::Output(_) => exit_code::OUTPUT,
            Self::GenerationFailed { .. } | Self::Unhealthy | Self::AllProbesFailed => {
                exit_code::GENERAL
            }
        }
    }
}
