// ── Firewall and port-forward domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named address/port group referenced by firewall rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallGroupRecord {
    pub name: String,
    pub group_type: String,
    pub members: Vec<String>,
}

/// Rule disposition. Unrecognized raw actions map to `Drop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FirewallAction {
    Accept,
    Drop,
    Reject,
}

impl FirewallAction {
    /// Maps a raw controller action string, case-insensitively.
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "accept" | "allow" => Self::Accept,
            "reject" => Self::Reject,
            _ => Self::Drop,
        }
    }
}

impl fmt::Display for FirewallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Accept => "accept",
            Self::Drop => "drop",
            Self::Reject => "reject",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallRuleRecord {
    pub name: String,
    pub action: FirewallAction,
    pub enabled: bool,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub protocol: Option<String>,
    pub port: Option<String>,
    pub index: i64,
}

/// A destination-NAT (port forward) entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatRuleRecord {
    pub name: String,
    pub enabled: bool,
    pub external_port: Option<String>,
    pub internal_ip: Option<String>,
    pub internal_port: Option<String>,
    pub protocol: Option<String>,
}
