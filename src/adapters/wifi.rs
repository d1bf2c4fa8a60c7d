//! WiFi adapter: station join with a deadline, soft access point fallback.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Bring-up policy
//!
//! With station credentials configured the adapter tries to join that
//! network until `sta_connect_timeout_ms` runs out.  On failure, or with
//! no credentials, it starts the soft AP.  Invalid AP credentials are
//! replaced by the factory ones so the panel always stays reachable.

use log::{info, warn};

use crate::config::NetworkConfig;
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{
        AccessPointConfiguration, AuthMethod, BlockingWifi, ClientConfiguration, Configuration,
        EspWifi,
    },
};

/// How the controller ended up on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    /// Joined an existing network.
    Station,
    /// Serving its own network.
    AccessPoint,
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), CommsError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(CommsError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CommsError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CommsError::InvalidPassword);
    }
    Ok(())
}

/// Station credentials worth trying, if any.
fn station_credentials(net: &NetworkConfig) -> Option<(&str, &str)> {
    if net.sta_ssid.is_empty() {
        return None;
    }
    match validate_ssid(&net.sta_ssid).and_then(|()| validate_password(&net.sta_password)) {
        Ok(()) => Some((net.sta_ssid.as_str(), net.sta_password.as_str())),
        Err(e) => {
            warn!("WiFi: ignoring station credentials: {}", e);
            None
        }
    }
}

/// AP credentials, replaced by the factory pair when invalid.
fn ap_credentials(net: &NetworkConfig) -> NetworkConfig {
    let valid = validate_ssid(&net.ap_ssid).and_then(|()| validate_password(&net.ap_password));
    match valid {
        Ok(()) => net.clone(),
        Err(e) => {
            warn!("WiFi: AP credentials rejected ({}), using factory AP", e);
            let factory = NetworkConfig::default();
            NetworkConfig {
                ap_ssid: factory.ap_ssid,
                ap_password: factory.ap_password,
                ..net.clone()
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: whether the configured station answers.
    #[cfg(not(target_os = "espidf"))]
    station_reachable: bool,
    mode: Option<NetworkMode>,
    ssid: heapless::String<32>,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
    ) -> Result<Self, CommsError> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs)).map_err(|e| {
            warn!("WiFi: driver init failed: {}", e);
            CommsError::WifiStartFailed
        })?;
        let wifi = BlockingWifi::wrap(esp_wifi, sysloop).map_err(|e| {
            warn!("WiFi: event loop wrap failed: {}", e);
            CommsError::WifiStartFailed
        })?;
        Ok(Self {
            wifi,
            mode: None,
            ssid: heapless::String::new(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            station_reachable: true,
            mode: None,
            ssid: heapless::String::new(),
        }
    }

    /// Simulation: make the next station join succeed or time out.
    #[cfg(not(target_os = "espidf"))]
    pub fn simulate_station(&mut self, reachable: bool) {
        self.station_reachable = reachable;
    }

    pub fn mode(&self) -> Option<NetworkMode> {
        self.mode
    }

    /// SSID of the network the controller is on (joined or served).
    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Join the configured station or fall back to the soft AP.
    pub fn bring_up(&mut self, net: &NetworkConfig) -> Result<NetworkMode, CommsError> {
        if let Some((ssid, password)) = station_credentials(net) {
            match self.join_station(ssid, password, net.sta_connect_timeout_ms) {
                Ok(()) => {
                    self.ssid = crate::config::fixed_str(ssid);
                    self.mode = Some(NetworkMode::Station);
                    info!("WiFi: joined '{}'", ssid);
                    return Ok(NetworkMode::Station);
                }
                Err(e) => warn!("WiFi: station '{}' unavailable ({}), starting AP", ssid, e),
            }
        }

        let ap = ap_credentials(net);
        self.start_access_point(&ap)?;
        self.ssid = ap.ap_ssid.clone();
        self.mode = Some(NetworkMode::AccessPoint);
        info!("WiFi: access point '{}' on channel {}", ap.ap_ssid, ap.ap_channel);
        Ok(NetworkMode::AccessPoint)
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn join_station(&mut self, ssid: &str, password: &str, timeout_ms: u32) -> Result<(), CommsError> {
        let config = Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| CommsError::InvalidSsid)?,
            password: password.try_into().map_err(|_| CommsError::InvalidPassword)?,
            auth_method: if password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        });
        self.wifi
            .set_configuration(&config)
            .map_err(|_| CommsError::WifiStartFailed)?;
        self.wifi.start().map_err(|_| CommsError::WifiStartFailed)?;

        let timeout = core::time::Duration::from_millis(u64::from(timeout_ms));
        let joined = self
            .wifi
            .wifi_mut()
            .connect()
            .and_then(|()| {
                self.wifi
                    .wifi_wait_while(|| self.wifi.is_connected().map(|c| !c), Some(timeout))
            })
            .and_then(|()| self.wifi.wait_netif_up());

        if let Err(e) = joined {
            warn!("WiFi: join failed: {}", e);
            // Leave the driver stopped so the AP configuration applies cleanly.
            let _ = self.wifi.stop();
            return Err(CommsError::StationJoinTimeout);
        }

        if let Ok(ip) = self.wifi.wifi().sta_netif().get_ip_info() {
            info!("WiFi: station IP {}", ip.ip);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn join_station(&mut self, ssid: &str, _password: &str, timeout_ms: u32) -> Result<(), CommsError> {
        if self.station_reachable {
            info!("WiFi(sim): joined '{}'", ssid);
            Ok(())
        } else {
            info!("WiFi(sim): '{}' silent for {} ms", ssid, timeout_ms);
            Err(CommsError::StationJoinTimeout)
        }
    }

    #[cfg(target_os = "espidf")]
    fn start_access_point(&mut self, net: &NetworkConfig) -> Result<(), CommsError> {
        let config = Configuration::AccessPoint(AccessPointConfiguration {
            ssid: net.ap_ssid.as_str().try_into().map_err(|_| CommsError::InvalidSsid)?,
            password: net
                .ap_password
                .as_str()
                .try_into()
                .map_err(|_| CommsError::InvalidPassword)?,
            auth_method: if net.ap_password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ssid_hidden: false,
            channel: net.ap_channel,
            max_connections: 4,
            ..Default::default()
        });
        self.wifi.set_configuration(&config).map_err(|e| {
            warn!("WiFi: AP configuration rejected: {}", e);
            CommsError::WifiStartFailed
        })?;
        self.wifi.start().map_err(|_| CommsError::WifiStartFailed)?;
        self.wifi
            .wait_netif_up()
            .map_err(|_| CommsError::WifiStartFailed)?;

        if let Ok(ip) = self.wifi.wifi().ap_netif().get_ip_info() {
            info!("WiFi: panel at http://{}", ip.ip);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn start_access_point(&mut self, net: &NetworkConfig) -> Result<(), CommsError> {
        info!("WiFi(sim): AP '{}' up", net.ap_ssid);
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
