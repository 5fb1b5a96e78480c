// Dialect negotiation.
//
// Resolves which API dialect a controller speaks and returns an
// authenticated session for it. Stateless by design: callers that want
// to remember a detected dialect across runs pin it themselves on the
// next call.

use tracing::{debug, info, warn};
use url::Url;

use crate::dialect::{ApiDialect, DialectSelection};
use crate::error::{DialectAttempt, Error, NegotiateError};
use crate::session::{Credential, Session};
use crate::transport::TransportConfig;

/// Everything needed to negotiate a session with one controller.
#[derive(Debug, Clone)]
pub struct NegotiationTarget {
    pub url: Url,
    pub credential: Credential,
    pub site: String,
    pub transport: TransportConfig,
    pub selection: DialectSelection,
}

/// Resolve a dialect and authenticate, returning a ready [`Session`].
///
/// With a pinned dialect, exactly one handshake is attempted and any
/// failure is [`NegotiateError::Authentication`] -- no fallback. With
/// [`DialectSelection::Auto`], dialects are tried in
/// [`ApiDialect::AUTO_PRIORITY`] order, short-circuiting on the first
/// handshake that succeeds; exhausting them all yields
/// [`NegotiateError::NoCompatibleDialect`] with the per-dialect reasons.
pub async fn resolve(target: &NegotiationTarget) -> Result<Session, NegotiateError> {
    match target.selection {
        DialectSelection::Pinned(dialect) => {
            debug!(%dialect, "authenticating with pinned dialect");
            attempt(target, dialect).await.map_err(|e| match e {
                // the controller never answered -- not a credential problem
                Error::Transport(_) | Error::Tls(_) => NegotiateError::Transport(e),
                other => NegotiateError::Authentication {
                    dialect,
                    message: other.to_string(),
                },
            })
        }
        DialectSelection::Auto => {
            let mut attempts = Vec::with_capacity(ApiDialect::AUTO_PRIORITY.len());
            for dialect in ApiDialect::AUTO_PRIORITY {
                debug!(%dialect, "probing dialect");
                match attempt(target, dialect).await {
                    Ok(session) => {
                        info!(%dialect, "dialect negotiated");
                        return Ok(session);
                    }
                    Err(e) => {
                        warn!(%dialect, error = %e, "handshake rejected");
                        attempts.push(DialectAttempt {
                            dialect,
                            reason: e.to_string(),
                        });
                    }
                }
            }
            Err(NegotiateError::NoCompatibleDialect { attempts })
        }
    }
}

/// One handshake attempt: build a client with the target's TLS policy,
/// then run the credential's authentication flow.
async fn attempt(target: &NegotiationTarget, dialect: ApiDialect) -> Result<Session, Error> {
    let http = target.transport.build_client()?;
    match &target.credential {
        Credential::Password { username, password } => {
            let session = Session::new(http, target.url.clone(), target.site.clone(), dialect);
            session.login(username, password).await?;
            Ok(session)
        }
        Credential::ApiKey(key) => {
            let session = Session::with_api_key(
                http,
                target.url.clone(),
                target.site.clone(),
                dialect,
                key.clone(),
            );
            session.verify_api_key().await?;
            Ok(session)
        }
    }
}
