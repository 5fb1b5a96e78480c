// ── Runtime connection profiles ──
//
// These types describe *how* to reach a controller. They carry
// credential data and connection tuning, but never touch disk — the
// config crate and the CLI construct them and hand them in.

use std::path::PathBuf;
use std::time::Duration;

use netscribe_api::{Credential, DialectSelection, NegotiationTarget, TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for local controllers.
    #[default]
    DangerAcceptInvalid,
}

impl PartialEq for TlsVerification {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SystemDefaults, Self::SystemDefaults) => true,
            (Self::CustomCa(a), Self::CustomCa(b)) => a == b,
            (Self::DangerAcceptInvalid, Self::DangerAcceptInvalid) => true,
            _ => false,
        }
    }
}

impl Eq for TlsVerification {}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Everything needed to document one controller. Immutable for the
/// duration of a run.
#[derive(Debug, Clone)]
pub struct ControllerProfile {
    /// Display name; also the filename stem for generated documents.
    pub name: String,
    /// Controller URL (e.g., `https://192.168.1.1:8443`).
    pub url: Url,
    /// Username/password pair or a bearer-token API key.
    pub credential: Credential,
    /// Site to document (defaults to "default").
    pub site: String,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Pinned dialect, or automatic detection.
    pub dialect: DialectSelection,
}

impl ControllerProfile {
    pub(crate) fn negotiation_target(&self) -> NegotiationTarget {
        NegotiationTarget {
            url: self.url.clone(),
            credential: self.credential.clone(),
            site: self.site.clone(),
            transport: TransportConfig { tls: (&self.tls).into(), timeout: self.timeout },
            selection: self.dialect,
        }
    }
}
