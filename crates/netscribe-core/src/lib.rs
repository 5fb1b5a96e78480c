//! Documentation engine between `netscribe-api` and the CLI.
//!
//! This crate owns the pipeline that turns a live controller into a
//! document on disk:
//!
//! - **[`pipeline::run_once`]** — Stateless entry point: for each
//!   [`ControllerProfile`], negotiate a dialect, collect every data
//!   category, normalize into a [`SiteSnapshot`], render, and commit
//!   through the [`OutputManager`]. Failures stay per-controller.
//!
//! - **Domain model** ([`model`]) — The immutable [`SiteSnapshot`] and
//!   its record types. Constructed once by [`normalize::normalize`],
//!   never mutated; the JSON rendering round-trips losslessly.
//!
//! - **[`OutputManager`]** — Timestamped documents, a single backup of
//!   the superseded document, an atomically-updated latest pointer,
//!   and the `generation-status.json` run ledger.
//!
//! - **[`pipeline::classify`]** — Folds per-controller outcomes into a
//!   [`HealthStatus`] for monitoring.

pub mod collect;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod render;

// ── Primary re-exports ──────────────────────────────────────────────
pub use netscribe_api::{ApiDialect, Credential, DialectSelection};

pub use collect::{Category, CollectionWarning, RawBundle};
pub use config::{ControllerProfile, TlsVerification};
pub use error::PipelineError;
pub use model::{IntegrityWarning, SiteSnapshot};
pub use normalize::SnapshotMeta;
pub use output::{GenerationRecord, OutputError, OutputManager};
pub use pipeline::{
    HealthStatus, ProbeResult, RunOptions, RunResult, RunSuccess, classify, classify_counts,
    probe, run_once,
};
pub use render::{CLIENT_DISPLAY_CAP, OutputFormat, RenderError, render};
