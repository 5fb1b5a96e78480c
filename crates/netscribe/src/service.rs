//! Daily scheduler loop for `netscribe run`.
//!
//! Generates immediately on startup, then sleeps until the next
//! configured HH:MM (local time). Ctrl-C cancels: in-flight documents
//! finish, remaining controllers are skipped, and the loop exits.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime, TimeZone};
use netscribe_config::Settings;
use netscribe_core::config::ControllerProfile;
use netscribe_core::output::OutputManager;
use netscribe_core::pipeline::{RunOptions, classify, run_once};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run(profiles: &[ControllerProfile], output: &OutputManager, settings: &Settings) {
    let cancel = CancellationToken::new();
    let options = RunOptions { formats: settings.formats.clone(), cancel: cancel.clone() };

    // ctrl-c flips the token; the pipeline checks it between controllers
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, finishing current document then stopping");
                cancel.cancel();
            }
        });
    }

    loop {
        let results = run_once(profiles, output, &options).await;
        info!(status = ?classify(&results), "generation pass complete");

        if cancel.is_cancelled() {
            break;
        }

        let wait = until_next_run(settings.schedule, Local::now());
        info!(
            next_run_in_secs = wait.as_secs(),
            schedule = format!("{:02}:{:02}", settings.schedule.0, settings.schedule.1),
            "sleeping until next scheduled run"
        );

        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            () = cancel.cancelled() => break,
        }
    }
}

/// Time until the next daily occurrence of `schedule` (hour, minute).
/// Always strictly in the future: a run at exactly HH:MM waits a day.
fn until_next_run(schedule: (u8, u8), now: DateTime<Local>) -> Duration {
    let (hour, minute) = schedule;
    let target_time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0)
        .unwrap_or(NaiveTime::MIN);

    let today = now.date_naive().and_time(target_time);
    let candidate = if today > now.naive_local() {
        today
    } else {
        today + chrono::Duration::days(1)
    };

    // over DST transitions chrono may report an ambiguous local time;
    // the earliest mapping is fine for a daily job
    let next = Local
        .from_local_datetime(&candidate)
        .earliest()
        .unwrap_or_else(|| now + chrono::Duration::days(1));

    (next - now).to_std().unwrap_or(Duration::from_secs(60))
}
