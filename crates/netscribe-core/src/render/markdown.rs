// Markdown report writer.
//
// Section order is fixed and every section is always emitted, with a
// placeholder line when its data is empty, so diffs between runs line
// up structurally.

use std::fmt::Write as _;

use crate::model::{ClientRecord, DeviceRole, KnownClientRecord, SiteSnapshot};

use super::CLIENT_DISPLAY_CAP;

const EMPTY_PLACEHOLDER: &str = "_None configured._";

pub(super) fn render(snapshot: &SiteSnapshot) -> String {
    let mut out = String::with_capacity(8 * 1024);

    let c = &snapshot.controller;
    let _ = writeln!(out, "# Network Documentation: {}", c.name);
    out.push('\n');
    let _ = writeln!(out, "Generated: {}", c.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    out.push('\n');

    out.push_str("## Controller\n\n");
    let _ = writeln!(out, "- **Host:** {}{}", c.host, c.port.map_or(String::new(), |p| format!(":{p}")));
    let _ = writeln!(out, "- **Site:** {}", c.site);
    let _ = writeln!(out, "- **API dialect:** {}", c.dialect);
    if let Some(hostname) = &c.hostname {
        let _ = writeln!(out, "- **Hostname:** {hostname}");
    }
    if let Some(version) = &c.version {
        let _ = writeln!(out, "- **Version:** {version}");
    }
    let _ = writeln!(out, "- **Uptime:** {}", format_uptime(c.uptime_secs));
    out.push('\n');

    networks(&mut out, snapshot);
    wlans(&mut out, snapshot);
    devices(&mut out, snapshot);
    active_clients(&mut out, &snapshot.active_clients);
    known_clients(&mut out, &snapshot.known_clients);
    firewall_groups(&mut out, snapshot);
    firewall_rules(&mut out, snapshot);
    port_forwards(&mut out, snapshot);
    settings(&mut out, snapshot);
    health(&mut out, snapshot);
    warnings(&mut out, snapshot);

    out
}

fn section(out: &mut String, title: &str, empty: bool, body: impl FnOnce(&mut String)) {
    let _ = writeln!(out, "## {title}");
    out.push('\n');
    if empty {
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
    } else {
        body(out);
    }
    out.push('\n');
}

fn networks(out: &mut String, snapshot: &SiteSnapshot) {
    section(out, "Networks", snapshot.networks.is_empty(), |out| {
        out.push_str("| Name | Purpose | VLAN | Subnet | DHCP | Domain |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for n in &snapshot.networks {
            let vlan = n.vlan_id.map_or_else(|| "-".to_string(), |v| v.to_string());
            let dhcp = if n.dhcp_enabled {
                n.dhcp_range.as_ref().map_or_else(
                    || "enabled".to_string(),
                    |r| format!("{} - {}", r.start, r.stop),
                )
            } else {
                "disabled".to_string()
            };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                n.name,
                n.purpose,
                vlan,
                opt(n.subnet.as_deref()),
                dhcp,
                opt(n.domain.as_deref()),
            );
        }
    });
}

fn wlans(out: &mut String, snapshot: &SiteSnapshot) {
    section(out, "Wireless Networks", snapshot.wlans.is_empty(), |out| {
        out.push_str("| SSID | Enabled | Security | Band | Guest | Hidden |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for w in &snapshot.wlans {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                w.name,
                yes_no(w.enabled),
                opt(w.security.as_deref()),
                opt(w.band.as_deref()),
                yes_no(w.guest),
                yes_no(w.hidden),
            );
        }
    });
}

fn devices(out: &mut String, snapshot: &SiteSnapshot) {
    section(out, "Devices", snapshot.devices.is_empty(), |out| {
        for role in DeviceRole::RENDER_ORDER {
            let group: Vec<_> = snapshot.devices.iter().filter(|d| d.role == role).collect();
            if group.is_empty() {
                continue;
            }
            let _ = writeln!(out, "### {}", role.label());
            out.push('\n');
            out.push_str("| Name | Model | IP | MAC | State | Firmware | Uptime |\n");
            out.push_str("|---|---|---|---|---|---|---|\n");
            for d in &group {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    d.name,
                    d.model,
                    opt(d.ip.as_deref()),
                    d.mac,
                    d.state,
                    opt(d.firmware_version.as_deref()),
                    format_uptime(d.uptime_secs),
                );
            }
            out.push('\n');
        }
    });
}

fn active_clients(out: &mut String, clients: &[ClientRecord]) {
    section(out, "Active Clients", clients.is_empty(), |out| {
        let _ = writeln!(out, "{} connected.", clients.len());
        out.push('\n');
        out.push_str("| Name | IP | MAC | Network | WLAN |\n");
        out.push_str("|---|---|---|---|---|\n");
        for c in clients.iter().take(CLIENT_DISPLAY_CAP) {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                c.name,
                opt(c.ip.as_deref()),
                c.mac,
                opt(c.network.as_deref()),
                opt(c.wlan.as_deref()),
            );
        }
        overflow(out, clients.len());
    });
}

fn known_clients(out: &mut String, clients: &[KnownClientRecord]) {
    section(out, "Known Clients", clients.is_empty(), |out| {
        out.push_str("| Name | MAC | Fixed IP | Network | Note |\n");
        out.push_str("|---|---|---|---|---|\n");
        for c in clients.iter().take(CLIENT_DISPLAY_CAP) {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                c.name,
                c.mac,
                opt(c.fixed_ip.as_deref()),
                opt(c.network.as_deref()),
                opt(c.note.as_deref()),
            );
        }
        overflow(out, clients.len());
    });
}

// Exactly one summary line, only past the cap.
fn overflow(out: &mut String, len: usize) {
    if len > CLIENT_DISPLAY_CAP {
        out.push('\n');
        let _ = writeln!(out, "... and {} more", len - CLIENT_DISPLAY_CAP);
    }
}

fn firewall_groups(out: &mut String, snapshot: &SiteSnapshot) {
    section(out, "Firewall Groups", snapshot.firewall_groups.is_empty(), |out| {
        out.push_str("| Name | Type | Members |\n");
        out.push_str("|---|---|---|\n");
        for g in &snapshot.firewall_groups {
            let _ = writeln!(out, "| {} | {} | {} |", g.name, g.group_type, g.members.join(", "));
        }
    });
}

fn firewall_rules(out: &mut String, snapshot: &SiteSnapshot) {
    section(out, "Firewall Rules", snapshot.firewall_rules.is_empty(), |out| {
        out.push_str("| # | Name | Action | Enabled | Source | Destination | Protocol | Port |\n");
        out.push_str("|---|---|---|---|---|---|---|---|\n");
        for r in &snapshot.firewall_rules {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                r.index,
                r.name,
                r.action,
                yes_no(r.enabled),
                opt(r.source.as_deref()),
                opt(r.destination.as_deref()),
                opt(r.protocol.as_deref()),
                opt(r.port.as_deref()),
            );
        }
    });
}

fn port_forwards(out: &mut String, snapshot: &SiteSnapshot) {
    section(out, "Port Forwarding", snapshot.nat_rules.is_empty(), |out| {
        out.push_str("| Name | Enabled | External Port | Internal IP | Internal Port | Protocol |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for r in &snapshot.nat_rules {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                r.name,
                yes_no(r.enabled),
                opt(r.external_port.as_deref()),
                opt(r.internal_ip.as_deref()),
                opt(r.internal_port.as_deref()),
                opt(r.protocol.as_deref()),
            );
        }
    });
}

fn settings(out: &mut String, snapshot: &SiteSnapshot) {
    section(out, "Settings", snapshot.settings.is_empty(), |out| {
        for (key, fields) in &snapshot.settings {
            let _ = writeln!(out, "### {key}");
            out.push('\n');
            for (field, value) in fields {
                let _ = writeln!(out, "- **{field}:** {value}");
            }
            out.push('\n');
        }
    });
}

fn health(out: &mut String, snapshot: &SiteSnapshot) {
    section(out, "Health", snapshot.health.is_empty(), |out| {
        out.push_str("| Subsystem | Status |\n");
        out.push_str("|---|---|\n");
        for (subsystem, record) in &snapshot.health {
            let _ = writeln!(out, "| {subsystem} | {} |", record.status);
        }
    });
}

fn warnings(out: &mut String, snapshot: &SiteSnapshot) {
    if snapshot.warnings.is_empty() {
        return;
    }
    out.push_str("## Data Warnings\n\n");
    for warning in &snapshot.warnings {
        match warning {
            crate::model::IntegrityWarning::DuplicateMac { category, mac } => {
                let _ = writeln!(out, "- duplicate MAC `{mac}` in {category} (kept last entry)");
            }
        }
    }
    out.push('\n');
}

fn opt(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn format_uptime(secs: i64) -> String {
    if secs <= 0 {
        return "-".to_string();
    }
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
