// ── Raw collection ──
//
// Pulls every documented category from a live session. Category
// failures are isolated: the category is substituted with an empty
// collection and recorded as a warning. Only an expired session
// aborts the whole collection, since every later fetch would fail
// the same way.

use std::fmt;

use netscribe_api::models::{
    RawClientEntry, RawDevice, RawFirewallGroup, RawFirewallRule, RawHealth, RawKnownClient,
    RawNetwork, RawPortForward, RawSetting, RawSysInfo, RawWlan,
};
use netscribe_api::{Error as ApiError, Session};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PipelineError;

/// Data category fetched from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Networks,
    Wlans,
    Devices,
    ActiveClients,
    KnownClients,
    FirewallGroups,
    FirewallRules,
    PortForwards,
    Settings,
    Health,
    SysInfo,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Networks => "networks",
            Self::Wlans => "wlans",
            Self::Devices => "devices",
            Self::ActiveClients => "active-clients",
            Self::KnownClients => "known-clients",
            Self::FirewallGroups => "firewall-groups",
            Self::FirewallRules => "firewall-rules",
            Self::PortForwards => "port-forwards",
            Self::Settings => "settings",
            Self::Health => "health",
            Self::SysInfo => "sysinfo",
        };
        f.write_str(name)
    }
}

/// A category that could not be fetched. The document is still
/// generated; the category appears empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionWarning {
    pub category: Category,
    pub reason: String,
}

/// Everything the controller returned, pre-normalization.
#[derive(Debug, Clone, Default)]
pub struct RawBundle {
    pub networks: Vec<RawNetwork>,
    pub wlans: Vec<RawWlan>,
    pub devices: Vec<RawDevice>,
    pub active_clients: Vec<RawClientEntry>,
    pub known_clients: Vec<RawKnownClient>,
    pub firewall_groups: Vec<RawFirewallGroup>,
    pub firewall_rules: Vec<RawFirewallRule>,
    pub port_forwards: Vec<RawPortForward>,
    pub settings: Vec<RawSetting>,
    pub health: Vec<RawHealth>,
    pub sysinfo: RawSysInfo,
}

/// Fetch all categories from the session.
///
/// Returns the bundle plus a warning per failed category. Fails only
/// when the session itself has expired.
pub async fn collect(
    session: &Session,
) -> Result<(RawBundle, Vec<CollectionWarning>), PipelineError> {
    let mut warnings = Vec::new();
    let w = &mut warnings;

    let bundle = RawBundle {
        networks: guard(Category::Networks, session.list_networks().await, w)?,
        wlans: guard(Category::Wlans, session.list_wlans().await, w)?,
        devices: guard(Category::Devices, session.list_devices().await, w)?,
        active_clients: guard(Category::ActiveClients, session.list_clients().await, w)?,
        known_clients: guard(Category::KnownClients, session.list_known_clients().await, w)?,
        firewall_groups: guard(Category::FirewallGroups, session.list_firewall_groups().await, w)?,
        firewall_rules: guard(Category::FirewallRules, session.list_firewall_rules().await, w)?,
        port_forwards: guard(Category::PortForwards, session.list_port_forwards().await, w)?,
        settings: guard(Category::Settings, session.list_settings().await, w)?,
        health: guard(Category::Health, session.list_health().await, w)?,
        sysinfo: guard(Category::SysInfo, session.get_sysinfo().await, w)?,
    };

    Ok((bundle, warnings))
}

/// Isolate one category: an expired session is fatal, anything else
/// downgrades to a warning plus an empty substitute.
fn guard<T: Default>(
    category: Category,
    result: Result<T, ApiError>,
    warnings: &mut Vec<CollectionWarning>,
) -> Result<T, PipelineError> {
    match result {
        Ok(items) => Ok(items),
        Err(ApiError::SessionExpired) => Err(PipelineError::SessionExpired),
        Err(err) => {
            warn!(category = %category, error = %err, "fetch failed, substituting empty");
            warnings.push(CollectionWarning { category, reason: err.to_string() });
            Ok(T::default())
        }
    }
}
