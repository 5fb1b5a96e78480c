// ── Device domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// Device role, derived from the raw `type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceRole {
    Gateway,
    Switch,
    AccessPoint,
    /// Unrecognized device types land here rather than failing.
    Other,
}

impl DeviceRole {
    /// Rendering order for the role-grouped device section.
    pub const RENDER_ORDER: [Self; 4] = [Self::Gateway, Self::Switch, Self::AccessPoint, Self::Other];

    pub fn label(self) -> &'static str {
        match self {
            Self::Gateway => "Gateways",
            Self::Switch => "Switches",
            Self::AccessPoint => "Access Points",
            Self::Other => "Other Devices",
        }
    }
}

/// Connection state, from the controller's integer state code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionState {
    Connected,
    Disconnected,
    Pending,
    Unknown,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// One adopted infrastructure device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub name: String,
    pub model: String,
    pub role: DeviceRole,
    pub ip: Option<String>,
    /// Unique within a snapshot's device set.
    pub mac: MacAddress,
    pub state: ConnectionState,
    pub firmware_version: Option<String>,
    pub uptime_secs: i64,
}
