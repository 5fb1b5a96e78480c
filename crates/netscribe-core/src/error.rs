use netscribe_api::DialectAttempt;

use crate::output::OutputError;
use crate::render::RenderError;

/// Fatal, per-controller pipeline failures. Each variant aborts the
/// controller it occurred on and never propagates to siblings.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("authentication rejected: {message}")]
    Authentication { message: String },

    #[error("no compatible API dialect ({} attempted)", attempts.len())]
    NoCompatibleDialect { attempts: Vec<DialectAttempt> },

    #[error("session expired mid-collection")]
    SessionExpired,

    #[error("could not reach controller: {message}")]
    Connection { message: String },

    #[error("render failed")]
    Render(#[from] RenderError),

    #[error("output write failed")]
    OutputWrite(#[from] OutputError),
}

impl From<netscribe_api::NegotiateError> for PipelineError {
    fn from(err: netscribe_api::NegotiateError) -> Self {
        match err {
            netscribe_api::NegotiateError::Authentication { dialect, message } => {
                Self::Authentication { message: format!("{dialect}: {message}") }
            }
            netscribe_api::NegotiateError::NoCompatibleDialect { attempts } => {
                Self::NoCompatibleDialect { attempts }
            }
            netscribe_api::NegotiateError::Transport(inner) => {
                Self::Connection { message: inner.to_string() }
            }
        }
    }
}
