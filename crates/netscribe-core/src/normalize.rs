// ── Normalization ──
//
// Turns a raw bundle into the immutable `SiteSnapshot`. Pure: the
// output is a function of the inputs alone. The capture timestamp
// arrives via `SnapshotMeta` so repeated calls on the same bundle
// produce identical snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use netscribe_api::ApiDialect;
use netscribe_api::models::{RawClientEntry, RawDevice, RawKnownClient};
use serde_json::Value;

use crate::collect::RawBundle;
use crate::model::{
    ClientRecord, ConnectionState, ControllerInfo, DeviceRecord, DeviceRole, DhcpRange,
    FirewallAction, FirewallGroupRecord, FirewallRuleRecord, HealthRecord, IntegrityWarning,
    KnownClientRecord, MacAddress, NatRuleRecord, NetworkPurpose, NetworkRecord, SiteSnapshot,
    WlanRecord,
};

/// Capture context the normalizer cannot derive from the bundle.
#[derive(Debug, Clone)]
pub struct SnapshotMeta {
    pub controller_name: String,
    pub host: String,
    pub port: Option<u16>,
    pub dialect: ApiDialect,
    pub site: String,
    pub generated_at: DateTime<Utc>,
}

/// Build a snapshot from raw controller data.
///
/// Never fails: missing fields fall back to per-field defaults, and
/// data-quality problems surface as `IntegrityWarning`s on the
/// snapshot rather than errors.
pub fn normalize(meta: &SnapshotMeta, bundle: &RawBundle) -> SiteSnapshot {
    let mut warnings = Vec::new();

    let controller = ControllerInfo {
        name: meta.controller_name.clone(),
        host: meta.host.clone(),
        port: meta.port,
        dialect: meta.dialect.to_string(),
        site: meta.site.clone(),
        generated_at: meta.generated_at,
        hostname: bundle.sysinfo.hostname.clone(),
        version: bundle.sysinfo.version.clone(),
        uptime_secs: coerce_i64(bundle.sysinfo.uptime.as_ref()),
    };

    let networks = bundle.networks.iter().map(normalize_network).collect();
    let wlans = bundle.wlans.iter().map(normalize_wlan).collect();

    let devices = dedup_by_mac(
        bundle.devices.iter().map(normalize_device).collect(),
        |d: &DeviceRecord| d.mac.clone(),
        "devices",
        &mut warnings,
    );
    let active_clients = dedup_by_mac(
        bundle.active_clients.iter().map(normalize_client).collect(),
        |c: &ClientRecord| c.mac.clone(),
        "active-clients",
        &mut warnings,
    );
    let known_clients = dedup_by_mac(
        bundle.known_clients.iter().map(normalize_known_client).collect(),
        |c: &KnownClientRecord| c.mac.clone(),
        "known-clients",
        &mut warnings,
    );

    let firewall_groups = bundle
        .firewall_groups
        .iter()
        .map(|g| FirewallGroupRecord {
            name: g.name.clone().unwrap_or_default(),
            group_type: g.group_type.clone().unwrap_or_default(),
            members: g.group_members.clone(),
        })
        .collect();

    let firewall_rules = bundle
        .firewall_rules
        .iter()
        .map(|r| FirewallRuleRecord {
            name: r.name.clone().unwrap_or_default(),
            action: FirewallAction::from_raw(r.action.as_deref().unwrap_or_default()),
            enabled: r.enabled.unwrap_or(false),
            source: r.src_address.clone(),
            destination: r.dst_address.clone(),
            protocol: r.protocol.clone(),
            port: coerce_port(r.dst_port.as_ref()),
            index: coerce_i64(r.rule_index.as_ref()),
        })
        .collect();

    let nat_rules = bundle
        .port_forwards
        .iter()
        .map(|p| NatRuleRecord {
            name: p.name.clone().unwrap_or_default(),
            enabled: p.enabled.unwrap_or(false),
            external_port: coerce_port(p.dst_port.as_ref()),
            internal_ip: p.fwd.clone(),
            internal_port: coerce_port(p.fwd_port.as_ref()),
            protocol: p.proto.clone(),
        })
        .collect();

    let mut settings: BTreeMap<String, BTreeMap<String, Value>> = BTreeMap::new();
    for section in &bundle.settings {
        let Some(key) = section.key.clone().filter(|k| !k.is_empty()) else {
            continue;
        };
        let fields: BTreeMap<String, Value> =
            section.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        settings.insert(key, fields);
    }

    let mut health: BTreeMap<String, HealthRecord> = BTreeMap::new();
    for entry in &bundle.health {
        let Some(subsystem) = entry.subsystem.clone().filter(|s| !s.is_empty()) else {
            continue;
        };
        let metrics = entry
            .metrics
            .iter()
            .filter_map(|(k, v)| numeric(v).map(|n| (k.clone(), n)))
            .collect();
        health.insert(subsystem, HealthRecord {
            status: entry.status.clone().unwrap_or_else(|| "unknown".to_string()),
            metrics,
        });
    }

    SiteSnapshot {
        controller,
        networks,
        wlans,
        devices,
        active_clients,
        known_clients,
        firewall_groups,
        firewall_rules,
        nat_rules,
        settings,
        health,
        warnings,
    }
}

// ── Per-category mapping ──

fn normalize_network(raw: &netscribe_api::models::RawNetwork) -> NetworkRecord {
    let dhcp_range = match (&raw.dhcp_start, &raw.dhcp_stop) {
        (Some(start), Some(stop)) => {
            Some(DhcpRange { start: start.clone(), stop: stop.clone() })
        }
        _ => None,
    };
    NetworkRecord {
        name: raw.name.clone().unwrap_or_default(),
        purpose: purpose_from_raw(raw.purpose.as_deref().unwrap_or_default()),
        vlan_id: vlan_id(raw.vlan.as_ref()),
        subnet: raw.ip_subnet.clone(),
        dhcp_enabled: raw.dhcp_enabled.unwrap_or(false),
        dhcp_range,
        domain: raw.domain_name.clone(),
    }
}

fn normalize_wlan(raw: &netscribe_api::models::RawWlan) -> WlanRecord {
    WlanRecord {
        name: raw.name.clone().unwrap_or_default(),
        enabled: raw.enabled.unwrap_or(false),
        security: raw.security.clone(),
        band: raw.wlan_band.clone(),
        guest: raw.is_guest.unwrap_or(false),
        hidden: raw.hide_ssid.unwrap_or(false),
        network: raw.networkconf_id.clone(),
    }
}

fn normalize_device(raw: &RawDevice) -> DeviceRecord {
    let mac = MacAddress::new(&raw.mac);
    let model = raw.model.clone().unwrap_or_default();
    DeviceRecord {
        name: raw.name.clone().filter(|n| !n.is_empty()).unwrap_or_else(|| mac.to_string()),
        role: device_role(raw.device_type.as_deref(), &model),
        model,
        ip: raw.ip.clone(),
        mac,
        state: connection_state(raw.state),
        firmware_version: raw.version.clone(),
        uptime_secs: coerce_i64(raw.uptime.as_ref()),
    }
}

fn normalize_client(raw: &RawClientEntry) -> ClientRecord {
    let mac = MacAddress::new(&raw.mac);
    let name = raw
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| raw.hostname.clone().filter(|h| !h.is_empty()))
        .unwrap_or_else(|| mac.to_string());
    ClientRecord {
        name,
        ip: raw.ip.clone(),
        mac,
        network: raw.network.clone(),
        wlan: raw.essid.clone(),
    }
}

fn normalize_known_client(raw: &RawKnownClient) -> KnownClientRecord {
    let mac = MacAddress::new(&raw.mac);
    let name = raw
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| raw.hostname.clone().filter(|h| !h.is_empty()))
        .unwrap_or_else(|| mac.to_string());
    KnownClientRecord {
        name,
        mac,
        fixed_ip: raw.fixed_ip.clone(),
        network: raw.network.clone(),
        note: raw.note.clone(),
    }
}

// ── Field mapping helpers ──

fn purpose_from_raw(raw: &str) -> NetworkPurpose {
    match raw {
        "corporate" => NetworkPurpose::Corporate,
        "guest" => NetworkPurpose::Guest,
        "wan" => NetworkPurpose::Wan,
        "vlan-only" => NetworkPurpose::VlanOnly,
        _ => NetworkPurpose::Other,
    }
}

/// Role from the API `type` discriminator, with a model-prefix
/// fallback for firmware that omits it.
fn device_role(device_type: Option<&str>, model: &str) -> DeviceRole {
    match device_type {
        Some("uap") => return DeviceRole::AccessPoint,
        Some("usw") => return DeviceRole::Switch,
        Some("ugw" | "udm" | "uxg") => return DeviceRole::Gateway,
        Some(_) | None => {}
    }
    let model = model.to_ascii_uppercase();
    if model.starts_with("UAP") || model.starts_with("U6") || model.starts_with("U7") {
        DeviceRole::AccessPoint
    } else if model.starts_with("USW") || model.starts_with("US") {
        DeviceRole::Switch
    } else if model.starts_with("UGW") || model.starts_with("UDM") || model.starts_with("UXG") {
        DeviceRole::Gateway
    } else {
        DeviceRole::Other
    }
}

fn connection_state(state: Option<i64>) -> ConnectionState {
    match state {
        Some(1) => ConnectionState::Connected,
        Some(0) => ConnectionState::Disconnected,
        Some(2) => ConnectionState::Pending,
        _ => ConnectionState::Unknown,
    }
}

/// Coerce a flaky numeric field to i64. Strings and floats both
/// appear in the wild; anything unparseable counts as 0.
fn coerce_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => {
            n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0)
        }
        Some(Value::String(s)) => {
            s.trim().parse::<i64>().or_else(|_| s.trim().parse::<f64>().map(|f| f as i64)).unwrap_or(0)
        }
        _ => 0,
    }
}

/// Ports keep their textual shape ("8080", "8000-8010") rather than
/// forcing a number.
fn coerce_port(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn vlan_id(value: Option<&Value>) -> Option<u16> {
    let n = coerce_i64(value);
    if n > 0 { u16::try_from(n).ok() } else { None }
}

fn numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
}

/// Collapse duplicate MACs, last occurrence winning. The surviving
/// record keeps the first occurrence's position so output order stays
/// stable, and each collision is flagged. Records without a MAC carry
/// no identity and pass through unkeyed.
fn dedup_by_mac<T>(
    records: Vec<T>,
    mac_of: impl Fn(&T) -> MacAddress,
    category: &str,
    warnings: &mut Vec<IntegrityWarning>,
) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(records.len());
    let mut index: std::collections::HashMap<MacAddress, usize> = std::collections::HashMap::new();
    for record in records {
        let mac = mac_of(&record);
        if mac.as_str().is_empty() {
            out.push(record);
            continue;
        }
        if let Some(&pos) = index.get(&mac) {
            warnings.push(IntegrityWarning::DuplicateMac {
                category: category.to_string(),
                mac: mac.clone(),
            });
            out[pos] = record;
        } else {
            index.insert(mac, out.len());
            out.push(record);
        }
    }
    out
}
