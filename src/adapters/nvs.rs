//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`] for the relay
//! controller.
//!
//! - Config validation: all fields are range-checked before persistence.
//! - Versioned blob: one version byte, then the postcard encoding.  A
//!   version mismatch or undecodable payload reads as corrupted and the
//!   caller falls back to defaults.
//! - Namespace isolation: each subsystem uses its own namespace.
//! - Atomic writes: ESP-IDF NVS commits are atomic per blob.

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::{
    MAX_AUTO_CYCLE_MS, MAX_BLITZ_MS, MAX_RELAY_COUNT, MAX_RUNNING_SPEED_MS, MAX_STA_TIMEOUT_MS,
    MIN_AUTO_CYCLE_MS, MIN_BLITZ_MS, MIN_RELAYS, MIN_RUNNING_SPEED_MS, MIN_STA_TIMEOUT_MS,
    RelayConfig,
};
use log::{info, warn};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

pub const CONFIG_NAMESPACE: &str = "relaymatrix";
pub const CONFIG_KEY: &str = "relaycfg";

/// Bumped whenever `RelayConfig`'s wire layout changes.
pub const CONFIG_VERSION: u8 = 1;

const MAX_BLOB_SIZE: usize = 512;

pub struct NvsAdapter {
    #[cfg(target_os = "espidf")]
    partition: EspDefaultNvsPartition,
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Wrap the default NVS partition (already initialised by
    /// `EspDefaultNvsPartition::take`).
    #[cfg(target_os = "espidf")]
    pub fn new(partition: EspDefaultNvsPartition) -> Self {
        info!("NvsAdapter: ESP-IDF NVS ready");
        Self { partition }
    }

    /// In-memory backend for host builds.
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        info!("NvsAdapter: simulation backend");
        Self {
            store: std::cell::RefCell::new(HashMap::new()),
        }
    }

    #[cfg(target_os = "espidf")]
    fn open(&self, namespace: &str, read_write: bool) -> Result<EspNvs<NvsDefault>, StorageError> {
        EspNvs::new(self.partition.clone(), namespace, read_write).map_err(|e| {
            // A read-only open of a namespace never written reports NOT_FOUND.
            if e.code() == esp_idf_svc::sys::ESP_ERR_NVS_NOT_FOUND {
                return StorageError::NotFound;
            }
            warn!("NvsAdapter: open '{}' failed: {}", namespace, e);
            StorageError::IoError
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for NvsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Range checks mirroring the clamps in [`crate::config`].
pub fn validate_config(cfg: &RelayConfig) -> Result<(), ConfigError> {
    if !(MIN_RELAYS..=MAX_RELAY_COUNT).contains(&cfg.relay_count) {
        return Err(ConfigError::ValidationFailed("relay_count must be 2–8"));
    }
    if !(MIN_RUNNING_SPEED_MS..=MAX_RUNNING_SPEED_MS).contains(&cfg.running_speed_ms) {
        return Err(ConfigError::ValidationFailed(
            "running_speed_ms must be 40–500",
        ));
    }
    if !(MIN_BLITZ_MS..=MAX_BLITZ_MS).contains(&cfg.blitz_on_ms)
        || !(MIN_BLITZ_MS..=MAX_BLITZ_MS).contains(&cfg.blitz_off_ms)
    {
        return Err(ConfigError::ValidationFailed(
            "blitz_on_ms / blitz_off_ms must be 50–5000",
        ));
    }
    if !(MIN_AUTO_CYCLE_MS..=MAX_AUTO_CYCLE_MS).contains(&cfg.auto_cycle_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "auto_cycle_interval_ms must be 1000–60000",
        ));
    }
    if !(1..=100).contains(&cfg.control_loop_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "control_loop_interval_ms must be 1–100",
        ));
    }
    if !(5..=3600).contains(&cfg.status_log_interval_secs) {
        return Err(ConfigError::ValidationFailed(
            "status_log_interval_secs must be 5–3600",
        ));
    }
    if !(1..=13).contains(&cfg.network.ap_channel) {
        return Err(ConfigError::ValidationFailed("ap_channel must be 1–13"));
    }
    if !(MIN_STA_TIMEOUT_MS..=MAX_STA_TIMEOUT_MS).contains(&cfg.network.sta_connect_timeout_ms) {
        return Err(ConfigError::ValidationFailed(
            "sta_connect_timeout_ms must be 1000–60000",
        ));
    }
    if cfg.network.ap_ssid.is_empty() {
        return Err(ConfigError::ValidationFailed("ap_ssid must not be empty"));
    }
    Ok(())
}

/// Version byte followed by the postcard payload.
pub fn encode_config(cfg: &RelayConfig) -> Result<Vec<u8>, ConfigError> {
    let mut bytes = vec![CONFIG_VERSION];
    let body = postcard::to_allocvec(cfg).map_err(|_| ConfigError::IoError)?;
    bytes.extend_from_slice(&body);
    if bytes.len() > MAX_BLOB_SIZE {
        return Err(ConfigError::StorageFull);
    }
    Ok(bytes)
}

/// Inverse of [`encode_config`]; the result is sanitized.
pub fn decode_config(bytes: &[u8]) -> Result<RelayConfig, ConfigError> {
    match bytes.split_first() {
        Some((&CONFIG_VERSION, body)) => postcard::from_bytes::<RelayConfig>(body)
            .map(|c| c.sanitized())
            .map_err(|_| ConfigError::Corrupted),
        _ => Err(ConfigError::Corrupted),
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<RelayConfig, ConfigError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        match self.read(CONFIG_NAMESPACE, CONFIG_KEY, &mut buf) {
            Ok(len) => {
                let cfg = decode_config(&buf[..len])?;
                info!("NvsAdapter: loaded config ({} bytes)", len);
                Ok(cfg)
            }
            Err(StorageError::NotFound) => {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(RelayConfig::default())
            }
            Err(e) => {
                warn!("NvsAdapter: config read failed: {}", e);
                Err(e.into())
            }
        }
    }

    fn save(&mut self, config: &RelayConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = encode_config(config)?;
        self.write(CONFIG_NAMESPACE, CONFIG_KEY, &bytes)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            match self.store.borrow().get(&composite) {
                Some(data) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                None => Err(StorageError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let nvs = self.open(namespace, false)?;
            match nvs.get_raw(key, buf) {
                Ok(Some(data)) => Ok(data.len()),
                Ok(None) => Err(StorageError::NotFound),
                Err(e) => {
                    warn!("NvsAdapter: read {}::{} failed: {}", namespace, key, e);
                    Err(StorageError::IoError)
                }
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().insert(composite, data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let mut nvs = self.open(namespace, true)?;
            nvs.set_raw(key, data).map(|_| ()).map_err(|e| {
                warn!("NvsAdapter: write {}::{} failed: {}", namespace, key, e);
                if e.code() == esp_idf_svc::sys::ESP_ERR_NVS_NOT_ENOUGH_SPACE {
                    StorageError::Full
                } else {
                    StorageError::IoError
                }
            })
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().remove(&composite);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let mut nvs = self.open(namespace, true)?;
            nvs.remove(key).map(|_| ()).map_err(|_| StorageError::IoError)
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow().contains_key(&composite)
        }

        #[cfg(target_os = "espidf")]
        {
            self.open(namespace, false)
                .ok()
                .and_then(|nvs| nvs.contains(key).ok())
                .unwrap_or(false)
        }
    }
}
