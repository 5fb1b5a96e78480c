mod cli;
mod error;
mod service;

use clap::Parser;
use netscribe_core::output::{OutputManager, read_status};
use netscribe_core::pipeline::{HealthStatus, RunOptions, classify_counts, probe, run_once};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = netscribe_config::load_config(cli.config.as_deref())?;
    let (profiles, settings) = netscribe_config::resolve(&config)?;
    let output = OutputManager::new(&settings.output_dir)?;

    match cli.command {
        Command::Run => {
            service::run(&profiles, &output, &settings).await;
            Ok(())
        }
        Command::Once => once(&profiles, &output, &settings).await,
        Command::Health => health(&output),
        Command::Check => check(&profiles).await,
    }
}

async fn once(
    profiles: &[netscribe_core::ControllerProfile],
    output: &OutputManager,
    settings: &netscribe_config::Settings,
) -> Result<(), CliError> {
    let options = RunOptions { formats: settings.formats.clone(), ..Default::default() };
    let results = run_once(profiles, output, &options).await;

    let mut failed = 0;
    for result in &results {
        match &result.outcome {
            Ok(success) => {
                for path in &success.paths {
                    println!("{}: wrote {}", result.controller, path.display());
                }
                let warnings =
                    success.collection_warnings.len() + success.integrity_warnings;
                if warnings > 0 {
                    println!("{}: {warnings} warning(s), see log", result.controller);
                }
            }
            Err(err) => {
                failed += 1;
                println!("{}: failed ({err})", result.controller);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::GenerationFailed { failed, total: results.len() });
    }
    Ok(())
}

fn health(output: &OutputManager) -> Result<(), CliError> {
    let ledger = read_status(output.dir())?;
    let succeeded = ledger.values().filter(|r| r.success).count();
    let status = classify_counts(ledger.len(), succeeded);

    for (controller, record) in &ledger {
        if record.success {
            println!(
                "{controller}: ok at {} ({} warning(s))",
                record.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                record.warnings
            );
        } else {
            println!(
                "{controller}: FAILED at {} ({})",
                record.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                record.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!("overall: {status:?}");

    match status {
        HealthStatus::Unhealthy => Err(CliError::Unhealthy),
        HealthStatus::Healthy | HealthStatus::Degraded => Ok(()),
    }
}

async fn check(profiles: &[netscribe_core::ControllerProfile]) -> Result<(), CliError> {
    let results = probe(profiles).await;

    let mut reachable = 0;
    for result in &results {
        match &result.outcome {
            Ok(success) => {
                reachable += 1;
                println!(
                    "{}: ok ({} dialect, {} ms)",
                    result.controller,
                    success.dialect,
                    success.elapsed.as_millis()
                );
            }
            Err(err) => println!("{}: unreachable ({err})", result.controller),
        }
    }

    if reachable == 0 {
        return Err(CliError::AllProbesFailed);
    }
    Ok(())
}
