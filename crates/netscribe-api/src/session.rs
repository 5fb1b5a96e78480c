// Authenticated controller session.
//
// Wraps `reqwest::Client` with dialect-aware URL construction, envelope
// unwrapping, and CSRF token handling. Resource fetches live in
// `resources.rs` as inherent methods to keep this module focused on
// transport mechanics.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::dialect::ApiDialect;
use crate::error::Error;
use crate::models::Envelope;

/// How to authenticate against a controller.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Username/password handshake via the dialect's login endpoint.
    Password { username: String, password: SecretString },
    /// Bearer-token API key, sent on every request and verified with an
    /// identity probe instead of a login handshake.
    ApiKey(SecretString),
}

/// An authenticated session against one controller, speaking one dialect.
///
/// Obtained from [`crate::negotiate::resolve`]. All fetch methods return
/// unwrapped `data` payloads -- the `{ meta, data }` envelope is stripped
/// before the caller sees it.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
    site: String,
    dialect: ApiDialect,
    /// Bearer token for API-key authentication; `None` for cookie
    /// sessions.
    api_key: Option<SecretString>,
    /// CSRF token for proxied consoles. Captured from login response
    /// headers and rotated via `X-Updated-CSRF-Token`.
    csrf_token: RwLock<Option<String>>,
}

impl Session {
    /// Create a session from a pre-built client.
    ///
    /// The client's cookie jar must already hold a session cookie (or
    /// [`Session::login`] must be called before any fetch).
    pub fn new(http: reqwest::Client, base_url: Url, site: String, dialect: ApiDialect) -> Self {
        Self {
            http,
            base_url,
            site,
            dialect,
            api_key: None,
            csrf_token: RwLock::new(None),
        }
    }

    /// Create a session authenticated by API key instead of a cookie.
    ///
    /// The key rides along as a `Bearer` header on every request;
    /// [`Session::verify_api_key`] should be called before any fetch to
    /// confirm the controller accepts it.
    pub fn with_api_key(
        http: reqwest::Client,
        base_url: Url,
        site: String,
        dialect: ApiDialect,
        api_key: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            site,
            dialect,
            api_key: Some(api_key),
            csrf_token: RwLock::new(None),
        }
    }

    /// The dialect this session was negotiated with.
    pub fn dialect(&self) -> ApiDialect {
        self.dialect
    }

    /// The site identifier this session is scoped to.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Authenticate using username/password with this dialect's handshake.
    ///
    /// On success the session cookie lands in the client's jar and is used
    /// for all subsequent requests. Any non-2xx response is an
    /// [`Error::Authentication`] -- the caller decides whether to try
    /// another dialect.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self
            .base_url
            .join(self.dialect.login_path())
            .map_err(Error::InvalidUrl)?;

        debug!(dialect = %self.dialect, "logging in at {}", url);

        let body = self.dialect.login_body(username, password);
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        // Proxied consoles require the CSRF token on mutating requests
        // and rotate it per response.
        if let Some(token) = resp
            .headers()
            .get("X-CSRF-Token")
            .or_else(|| resp.headers().get("x-csrf-token"))
            .and_then(|v| v.to_str().ok())
        {
            self.set_csrf_token(token.to_owned());
        }

        debug!(dialect = %self.dialect, "login successful");
        Ok(())
    }

    /// Confirm the controller accepts this session's API key by fetching
    /// the identity endpoint.
    ///
    /// Only meaningful for sessions built with [`Session::with_api_key`];
    /// a rejected key is an [`Error::Authentication`].
    pub async fn verify_api_key(&self) -> Result<(), Error> {
        let url = self
            .base_url
            .join(self.dialect.self_path())
            .map_err(Error::InvalidUrl)?;

        debug!(dialect = %self.dialect, "verifying API key at {}", url);
        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("API key rejected (HTTP {status}): {}", preview(&body)),
            });
        }

        debug!(dialect = %self.dialect, "API key accepted");
        Ok(())
    }

    /// End the session. Errors are reported but a failed logout does not
    /// invalidate data already fetched.
    pub async fn logout(&self) -> Result<(), Error> {
        // A bearer-token session holds no server-side state to discard.
        if self.api_key.is_some() {
            return Ok(());
        }

        let url = self
            .base_url
            .join(self.dialect.logout_path())
            .map_err(Error::InvalidUrl)?;

        debug!("logging out at {}", url);
        let _resp = self
            .authorize(self.http.post(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        Ok(())
    }

    // ── Per-request authorization ────────────────────────────────────

    /// Attach the bearer key (API-key sessions) and the current CSRF
    /// token (proxied consoles rotate it per response) to a request.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = match &self.api_key {
            Some(key) => req.bearer_auth(key.expose_secret()),
            None => req,
        };
        match self.csrf_token() {
            Some(token) => req.header("X-CSRF-Token", token),
            None => req,
        }
    }

    // ── CSRF token management ────────────────────────────────────────

    fn csrf_token(&self) -> Option<String> {
        self.csrf_token.read().ok().and_then(|guard| guard.clone())
    }

    fn set_csrf_token(&self, token: String) {
        trace!("storing CSRF token");
        if let Ok(mut guard) = self.csrf_token.write() {
            *guard = Some(token);
        }
    }

    fn update_csrf_from_response(&self, headers: &reqwest::header::HeaderMap) {
        let new_token = headers
            .get("X-Updated-CSRF-Token")
            .or_else(|| headers.get("x-csrf-token"))
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if let Some(token) = new_token {
            self.set_csrf_token(token);
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a site-scoped URL: `{base}{prefix}/api/s/{site}/{path}`.
    ///
    /// All resource categories are site-scoped; only the dialect prefix
    /// varies.
    pub(crate) fn site_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.dialect.network_prefix().trim_end_matches('/');
        let full = format!("{base}{prefix}/api/s/{}/{path}", self.site);
        Url::parse(&full).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);

        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Parse the `{ meta, data }` envelope, returning `data` on success.
    ///
    /// HTTP 401 on an established session means the cookie expired or was
    /// revoked -- [`Error::SessionExpired`], which collection escalates as
    /// fatal for the whole run.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Vec<T>, Error> {
        let status = resp.status();

        // Capture any CSRF rotation before consuming the response.
        self.update_csrf_from_response(resp.headers());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: format!("HTTP {status}: {}", preview(&body)),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            }
        })?;

        match envelope.meta.rc.as_str() {
            "ok" => Ok(envelope.data),
            "error" if envelope.meta.msg.as_deref() == Some("api.err.LoginRequired") => {
                Err(Error::SessionExpired)
            }
            _ => Err(Error::Api {
                message: envelope
                    .meta
                    .msg
                    .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
            }),
        }
    }
}

/// First 200 characters of a body, for error messages.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
