// Raw controller API response types.
//
// Models for the controller's site-scoped JSON API. All list responses are
// wrapped in the `Envelope<T>` wire format. Fields use `#[serde(default)]`
// liberally because controllers are inconsistent about field presence
// across firmware generations; numeric fields that some firmware emits as
// strings are kept as `serde_json::Value` and coerced by the normalizer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Response envelope ────────────────────────────────────────────────

/// Standard controller response envelope.
///
/// Every site-scoped endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    pub data: Vec<T>,
}

/// Metadata from the envelope. `rc == "ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Network ──────────────────────────────────────────────────────────

/// Network / VLAN configuration from `rest/networkconf`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNetwork {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    /// VLAN id; some firmware sends this as a string.
    #[serde(default)]
    pub vlan: Option<Value>,
    #[serde(default)]
    pub ip_subnet: Option<String>,
    #[serde(default, rename = "dhcpd_enabled")]
    pub dhcp_enabled: Option<bool>,
    #[serde(default, rename = "dhcpd_start")]
    pub dhcp_start: Option<String>,
    #[serde(default, rename = "dhcpd_stop")]
    pub dhcp_stop: Option<String>,
    #[serde(default)]
    pub domain_name: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── WLAN ─────────────────────────────────────────────────────────────

/// Wireless network configuration from `rest/wlanconf`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWlan {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub security: Option<String>,
    #[serde(default)]
    pub wlan_band: Option<String>,
    #[serde(default)]
    pub is_guest: Option<bool>,
    #[serde(default)]
    pub hide_ssid: Option<bool>,
    #[serde(default)]
    pub networkconf_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Device ───────────────────────────────────────────────────────────

/// Adopted device from `stat/device`.
///
/// The API can return 100+ fields per device; we model the ones the
/// report needs and let the rest land in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDevice {
    #[serde(default)]
    pub mac: String,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    /// 0=offline, 1=online, 2=pending adoption.
    #[serde(default)]
    pub state: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
    /// Uptime in seconds; occasionally a string on old firmware.
    #[serde(default)]
    pub uptime: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Clients ──────────────────────────────────────────────────────────

/// Active client (station) from `stat/sta`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawClientEntry {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub essid: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Known / configured client from `rest/user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawKnownClient {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub fixed_ip: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Firewall ─────────────────────────────────────────────────────────

/// Firewall group from `rest/firewallgroup`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFirewallGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group_type: Option<String>,
    #[serde(default)]
    pub group_members: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Firewall rule from `rest/firewallrule`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFirewallRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub src_address: Option<String>,
    #[serde(default)]
    pub dst_address: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub dst_port: Option<Value>,
    #[serde(default)]
    pub rule_index: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── NAT / port forwarding ────────────────────────────────────────────

/// Port forward rule from `rest/portforward`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPortForward {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    /// External port; string on some firmware ("8080" or "8000-8010").
    #[serde(default)]
    pub dst_port: Option<Value>,
    #[serde(default)]
    pub fwd: Option<String>,
    #[serde(default)]
    pub fwd_port: Option<Value>,
    #[serde(default)]
    pub proto: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Settings ─────────────────────────────────────────────────────────

/// One settings section from `get/setting`.
///
/// The endpoint returns a list of objects, each tagged with a `key`
/// naming its category ("mgmt", "guest_access", ...); all remaining
/// fields are that category's key/value pairs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSetting {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(flatten)]
    pub values: serde_json::Map<String, Value>,
}

// ── Health ───────────────────────────────────────────────────────────

/// Health summary for one subsystem from `stat/health`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHealth {
    #[serde(default)]
    pub subsystem: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub metrics: serde_json::Map<String, Value>,
}

// ── System info ──────────────────────────────────────────────────────

/// Controller system info from `stat/sysinfo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSysInfo {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
