// ── Documentation pipeline ──
//
// Stateless entry points. Each controller runs its own
// negotiate → collect → normalize → render → commit chain; a failure
// stays confined to the controller it happened on. Cancellation is
// cooperative and checked between controllers, never mid-document.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use netscribe_api::{ApiDialect, Session, resolve};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::collect::{CollectionWarning, collect};
use crate::config::ControllerProfile;
use crate::error::PipelineError;
use crate::normalize::{SnapshotMeta, normalize};
use crate::output::OutputManager;
use crate::render::{OutputFormat, render};

/// Per-run knobs shared by every controller.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub formats: Vec<OutputFormat>,
    pub cancel: CancellationToken,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { formats: vec![OutputFormat::Markdown], cancel: CancellationToken::new() }
    }
}

/// What a successful controller run produced.
#[derive(Debug)]
pub struct RunSuccess {
    pub dialect: ApiDialect,
    pub paths: Vec<PathBuf>,
    pub collection_warnings: Vec<CollectionWarning>,
    pub integrity_warnings: usize,
}

/// Outcome for one controller within a run.
#[derive(Debug)]
pub struct RunResult {
    pub controller: String,
    pub outcome: Result<RunSuccess, PipelineError>,
}

/// Aggregate health of a run (or of the last recorded run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Every controller documented successfully.
    Healthy,
    /// At least one succeeded and at least one failed.
    Degraded,
    /// Nothing succeeded (or nothing was configured).
    Unhealthy,
}

/// Document every profile once, sequentially.
pub async fn run_once(
    profiles: &[ControllerProfile],
    output: &OutputManager,
    options: &RunOptions,
) -> Vec<RunResult> {
    let mut results = Vec::with_capacity(profiles.len());
    for profile in profiles {
        if options.cancel.is_cancelled() {
            info!("cancellation requested, stopping before remaining controllers");
            break;
        }
        info!(controller = %profile.name, url = %profile.url, "documenting controller");
        let outcome = document_controller(profile, output, options).await;
        if let Err(err) = &outcome {
            warn!(controller = %profile.name, error = %err, "controller run failed");
            if let Err(ledger_err) =
                output.record_failure(&profile.name, Utc::now(), &err.to_string())
            {
                warn!(controller = %profile.name, error = %ledger_err, "could not record failure");
            }
        }
        results.push(RunResult { controller: profile.name.clone(), outcome });
    }
    results
}

async fn document_controller(
    profile: &ControllerProfile,
    output: &OutputManager,
    options: &RunOptions,
) -> Result<RunSuccess, PipelineError> {
    let session = resolve(&profile.negotiation_target()).await?;
    let result = document_session(profile, &session, output, options).await;
    // Best effort; a failed logout does not taint the document.
    if let Err(err) = session.logout().await {
        debug!(controller = %profile.name, error = %err, "logout failed");
    }
    result
}

async fn document_session(
    profile: &ControllerProfile,
    session: &Session,
    output: &OutputManager,
    options: &RunOptions,
) -> Result<RunSuccess, PipelineError> {
    let (bundle, collection_warnings) = collect(session).await?;
    for warning in &collection_warnings {
        warn!(controller = %profile.name, category = %warning.category, reason = %warning.reason,
            "category unavailable");
    }

    let generated_at = Utc::now();
    let meta = SnapshotMeta {
        controller_name: profile.name.clone(),
        host: profile.url.host_str().unwrap_or_default().to_string(),
        port: profile.url.port(),
        dialect: session.dialect(),
        site: profile.site.clone(),
        generated_at,
    };
    let snapshot = normalize(&meta, &bundle);

    let mut paths = Vec::with_capacity(options.formats.len());
    for format in &options.formats {
        let bytes = render(&snapshot, *format)?;
        let path = output.commit(
            &profile.name,
            &bytes,
            *format,
            generated_at,
            collection_warnings.len() + snapshot.warnings.len(),
        )?;
        paths.push(path);
    }

    Ok(RunSuccess {
        dialect: session.dialect(),
        paths,
        collection_warnings,
        integrity_warnings: snapshot.warnings.len(),
    })
}

/// Classify a run's results.
pub fn classify(results: &[RunResult]) -> HealthStatus {
    let succeeded = results.iter().filter(|r| r.outcome.is_ok()).count();
    classify_counts(results.len(), succeeded)
}

/// Threshold policy shared by live runs and the recorded status ledger:
/// all succeeded, some succeeded, or none (including none configured).
pub fn classify_counts(total: usize, succeeded: usize) -> HealthStatus {
    if total == 0 || succeeded == 0 {
        HealthStatus::Unhealthy
    } else if succeeded == total {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    }
}

/// Outcome of a connectivity probe against one controller.
#[derive(Debug)]
pub struct ProbeResult {
    pub controller: String,
    pub outcome: Result<ProbeSuccess, PipelineError>,
}

#[derive(Debug)]
pub struct ProbeSuccess {
    pub dialect: ApiDialect,
    pub elapsed: Duration,
}

/// Authenticate against each profile without collecting anything,
/// reporting the negotiated dialect and response time.
pub async fn probe(profiles: &[ControllerProfile]) -> Vec<ProbeResult> {
    let mut results = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let started = Instant::now();
        let outcome = match resolve(&profile.negotiation_target()).await {
            Ok(session) => {
                let elapsed = started.elapsed();
                if let Err(err) = session.logout().await {
                    debug!(controller = %profile.name, error = %err, "logout failed");
                }
                Ok(ProbeSuccess { dialect: session.dialect(), elapsed })
            }
            Err(err) => Err(PipelineError::from(err)),
        };
        results.push(ProbeResult { controller: profile.name.clone(), outcome });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(name: &str) -> RunResult {
        RunResult {
            controller: name.to_string(),
            outcome: Ok(RunSuccess {
                dialect: ApiDialect::V5,
                paths: vec![],
                collection_warnings: vec![],
                integrity_warnings: 0,
            }),
        }
    }

    fn failed(name: &str) -> RunResult {
        RunResult {
            controller: name.to_string(),
            outcome: Err(PipelineError::SessionExpired),
        }
    }

    #[test]
    fn all_ok_is_healthy() {
        assert_eq!(classify(&[ok("a"), ok("b")]), HealthStatus::Healthy);
    }

    #[test]
    fn mixed_is_degraded() {
        assert_eq!(classify(&[ok("a"), failed("b")]), HealthStatus::Degraded);
    }

    #[test]
    fn all_failed_is_unhealthy() {
        assert_eq!(classify(&[failed("a"), failed("b")]), HealthStatus::Unhealthy);
    }

    #[test]
    fn no_controllers_is_unhealthy() {
        assert_eq!(classify(&[]), HealthStatus::Unhealthy);
    }

    #[test]
    fn ledger_counts_follow_the_same_policy() {
        assert_eq!(classify_counts(2, 2), classify(&[ok("a"), ok("b")]));
        assert_eq!(classify_counts(2, 1), classify(&[ok("a"), failed("b")]));
        assert_eq!(classify_counts(2, 0), classify(&[failed("a"), failed("b")]));
        assert_eq!(classify_counts(0, 0), classify(&[]));
    }
}
