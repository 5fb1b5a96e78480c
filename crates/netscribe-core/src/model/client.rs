// ── Client domain types ──

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// A currently-associated station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Best available display name: alias, then hostname, then MAC.
    pub name: String,
    pub ip: Option<String>,
    pub mac: MacAddress,
    pub network: Option<String>,
    /// SSID for wireless stations; `None` for wired.
    pub wlan: Option<String>,
}

/// A provisioned (known) client, whether or not currently online.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownClientRecord {
    pub name: String,
    pub mac: MacAddress,
    pub fixed_ip: Option<String>,
    pub network: Option<String>,
    pub note: Option<String>,
}
