// Resource category fetches.
//
// One method per resource category the report pipeline collects. Paths
// are identical across dialects; only the prefix applied by
// `Session::site_url` differs.

use tracing::debug;

use crate::error::Error;
use crate::models::{
    RawClientEntry, RawDevice, RawFirewallGroup, RawFirewallRule, RawHealth, RawKnownClient,
    RawNetwork, RawPortForward, RawSetting, RawSysInfo, RawWlan,
};
use crate::session::Session;

impl Session {
    /// Network / VLAN configurations.
    ///
    /// `GET /api/s/{site}/rest/networkconf`
    pub async fn list_networks(&self) -> Result<Vec<RawNetwork>, Error> {
        debug!("fetching networks");
        self.get(self.site_url("rest/networkconf")?).await
    }

    /// Wireless network configurations.
    ///
    /// `GET /api/s/{site}/rest/wlanconf`
    pub async fn list_wlans(&self) -> Result<Vec<RawWlan>, Error> {
        debug!("fetching wlans");
        self.get(self.site_url("rest/wlanconf")?).await
    }

    /// Adopted devices with statistics.
    ///
    /// `GET /api/s/{site}/stat/device`
    pub async fn list_devices(&self) -> Result<Vec<RawDevice>, Error> {
        debug!("fetching devices");
        self.get(self.site_url("stat/device")?).await
    }

    /// Active clients (stations).
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn list_clients(&self) -> Result<Vec<RawClientEntry>, Error> {
        debug!("fetching active clients");
        self.get(self.site_url("stat/sta")?).await
    }

    /// Known / configured clients.
    ///
    /// `GET /api/s/{site}/rest/user`
    pub async fn list_known_clients(&self) -> Result<Vec<RawKnownClient>, Error> {
        debug!("fetching known clients");
        self.get(self.site_url("rest/user")?).await
    }

    /// Firewall groups.
    ///
    /// `GET /api/s/{site}/rest/firewallgroup`
    pub async fn list_firewall_groups(&self) -> Result<Vec<RawFirewallGroup>, Error> {
        debug!("fetching firewall groups");
        self.get(self.site_url("rest/firewallgroup")?).await
    }

    /// Firewall rules, in controller rule order.
    ///
    /// `GET /api/s/{site}/rest/firewallrule`
    pub async fn list_firewall_rules(&self) -> Result<Vec<RawFirewallRule>, Error> {
        debug!("fetching firewall rules");
        self.get(self.site_url("rest/firewallrule")?).await
    }

    /// Port forward (NAT) rules.
    ///
    /// `GET /api/s/{site}/rest/portforward`
    pub async fn list_port_forwards(&self) -> Result<Vec<RawPortForward>, Error> {
        debug!("fetching port forwards");
        self.get(self.site_url("rest/portforward")?).await
    }

    /// Site settings, one entry per settings category.
    ///
    /// `GET /api/s/{site}/get/setting`
    pub async fn list_settings(&self) -> Result<Vec<RawSetting>, Error> {
        debug!("fetching settings");
        self.get(self.site_url("get/setting")?).await
    }

    /// Subsystem health entries (wan, lan, wlan, vpn, ...).
    ///
    /// `GET /api/s/{site}/stat/health`
    pub async fn list_health(&self) -> Result<Vec<RawHealth>, Error> {
        debug!("fetching health");
        self.get(self.site_url("stat/health")?).await
    }

    /// Controller system information.
    ///
    /// `GET /api/s/{site}/stat/sysinfo`
    ///
    /// The endpoint returns a single-element array; the element is
    /// unwrapped here.
    pub async fn get_sysinfo(&self) -> Result<RawSysInfo, Error> {
        debug!("fetching sysinfo");
        let mut data: Vec<RawSysInfo> = self.get(self.site_url("stat/sysinfo")?).await?;
        Ok(data.pop().unwrap_or_default())
    }
}
