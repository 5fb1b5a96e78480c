use thiserror::Error;

use crate::dialect::ApiDialect;

/// Top-level error type for the `netscribe-api` crate.
///
/// Covers authentication, transport, and controller API failures.
/// `netscribe-core` maps these into its pipeline-level taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session lost mid-run (cookie expired or revoked).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller API ──────────────────────────────────────────────
    /// Error parsed from the `{meta: {rc, msg}}` envelope or a non-2xx body.
    #[error("Controller API error: {message}")]
    Api { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the session is gone and no
    /// further request on it can succeed.
    pub fn is_auth_loss(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// One failed handshake attempt during auto-detection.
#[derive(Debug, Clone)]
pub struct DialectAttempt {
    pub dialect: ApiDialect,
    pub reason: String,
}

/// Errors from dialect negotiation (see [`crate::negotiate::resolve`]).
#[derive(Debug, Error)]
pub enum NegotiateError {
    /// A pinned dialect's handshake was rejected. No fallback is tried.
    #[error("Authentication failed on pinned dialect {dialect}: {message}")]
    Authentication {
        dialect: ApiDialect,
        message: String,
    },

    /// Auto-detection exhausted every dialect.
    #[error("No compatible API dialect ({} tried)", attempts.len())]
    NoCompatibleDialect { attempts: Vec<DialectAttempt> },

    /// The HTTP client itself could not be built (bad CA bundle etc.)
    #[error(transparent)]
    Transport(#[from] Error),
}
