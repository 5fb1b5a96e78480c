// ── Network and WLAN domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// Network purpose, from the controller's own taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkPurpose {
    Corporate,
    Guest,
    Wan,
    VlanOnly,
    /// Anything the controller reports that we don't recognize.
    Other,
}

impl fmt::Display for NetworkPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corporate => "corporate",
            Self::Guest => "guest",
            Self::Wan => "wan",
            Self::VlanOnly => "vlan-only",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// DHCP address pool boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpRange {
    pub start: String,
    pub stop: String,
}

/// One network / VLAN configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub name: String,
    pub purpose: NetworkPurpose,
    pub vlan_id: Option<u16>,
    /// CIDR subnet, as reported.
    pub subnet: Option<String>,
    pub dhcp_enabled: bool,
    pub dhcp_range: Option<DhcpRange>,
    pub domain: Option<String>,
}

/// One wireless network configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WlanRecord {
    pub name: String,
    pub enabled: bool,
    pub security: Option<String>,
    pub band: Option<String>,
    pub guest: bool,
    pub hidden: bool,
    /// Name or id of the wired network this WLAN maps onto.
    pub network: Option<String>,
}
