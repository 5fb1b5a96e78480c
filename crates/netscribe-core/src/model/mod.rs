//! Normalized site model.
//!
//! Everything here is produced once by the normalizer and never mutated
//! afterwards; renderers and the output layer take `&SiteSnapshot`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod client;
pub mod device;
pub mod firewall;
pub mod mac;
pub mod network;

pub use client::{ClientRecord, KnownClientRecord};
pub use device::{ConnectionState, DeviceRecord, DeviceRole};
pub use firewall::{FirewallAction, FirewallGroupRecord, FirewallRuleRecord, NatRuleRecord};
pub use mac::MacAddress;
pub use network::{DhcpRange, NetworkPurpose, NetworkRecord, WlanRecord};

/// Identity of the controller a snapshot was taken from, plus the
/// capture timestamp. The timestamp is supplied by the caller so that
/// normalization stays a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerInfo {
    /// Profile name the controller was configured under.
    pub name: String,
    pub host: String,
    pub port: Option<u16>,
    pub dialect: String,
    pub site: String,
    pub generated_at: DateTime<Utc>,
    pub hostname: Option<String>,
    pub version: Option<String>,
    pub uptime_secs: i64,
}

/// Per-subsystem health as reported by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub status: String,
    /// Numeric metrics only; non-numeric raw fields are dropped.
    pub metrics: BTreeMap<String, i64>,
}

/// A data-quality observation made while normalizing. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum IntegrityWarning {
    /// Two raw entries of the same category carried the same MAC;
    /// the later entry replaced the earlier one.
    DuplicateMac { category: String, mac: MacAddress },
}

/// The complete normalized state of one site at one instant.
///
/// Collections are ordered deterministically (sorted at construction)
/// and maps use `BTreeMap` so serialization is stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    pub controller: ControllerInfo,
    pub networks: Vec<NetworkRecord>,
    pub wlans: Vec<WlanRecord>,
    pub devices: Vec<DeviceRecord>,
    pub active_clients: Vec<ClientRecord>,
    pub known_clients: Vec<KnownClientRecord>,
    pub firewall_groups: Vec<FirewallGroupRecord>,
    pub firewall_rules: Vec<FirewallRuleRecord>,
    pub nat_rules: Vec<NatRuleRecord>,
    /// Controller settings keyed by section, then by field.
    pub settings: BTreeMap<String, BTreeMap<String, Value>>,
    /// Subsystem health keyed by subsystem name.
    pub health: BTreeMap<String, HealthRecord>,
    pub warnings: Vec<IntegrityWarning>,
}
