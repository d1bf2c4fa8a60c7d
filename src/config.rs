//! System configuration parameters
//!
//! All tunable parameters for the RelayMatrix controller.
//! Values can be overridden from the control page and persisted to NVS
//! with an explicit save.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::engine::patterns::PatternId;
use crate::pins::MAX_RELAYS;

// --- Bounds (inclusive) ---

pub const MIN_RELAYS: u8 = 2;
pub const MAX_RELAY_COUNT: u8 = MAX_RELAYS as u8;

pub const MIN_RUNNING_SPEED_MS: u16 = 40;
pub const MAX_RUNNING_SPEED_MS: u16 = 500;

pub const MIN_BLITZ_MS: u16 = 50;
pub const MAX_BLITZ_MS: u16 = 5000;

pub const MIN_AUTO_CYCLE_MS: u32 = 1_000;
pub const MAX_AUTO_CYCLE_MS: u32 = 60_000;

pub const MIN_STA_TIMEOUT_MS: u32 = 1_000;
pub const MAX_STA_TIMEOUT_MS: u32 = 60_000;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    // --- Relays ---
    /// Number of active relay channels (2-8)
    pub relay_count: u8,

    // --- Running mode ---
    /// Step interval of the running patterns (milliseconds)
    pub running_speed_ms: u16,
    /// Pattern selected when running mode starts
    pub pattern: PatternId,
    /// Automatically advance through the show playlist
    pub auto_cycle: bool,
    /// Time spent on each show stage (milliseconds)
    pub auto_cycle_interval_ms: u32,

    // --- Blitz mode ---
    /// Duration of the "all on" flash phase (milliseconds)
    pub blitz_on_ms: u16,
    /// Duration of the "all off" flash phase (milliseconds)
    pub blitz_off_ms: u16,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Status log interval (seconds)
    pub status_log_interval_secs: u32,

    // --- Network ---
    pub network: NetworkConfig,
}

/// Access point / station settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub ap_ssid: String<32>,
    /// Empty = open network
    pub ap_password: String<64>,
    pub ap_channel: u8,
    /// Empty = access point only
    pub sta_ssid: String<32>,
    pub sta_password: String<64>,
    /// Station association deadline before falling back to AP (milliseconds)
    pub sta_connect_timeout_ms: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ap_ssid: fixed_str("RELAY-MATRIX"),
            ap_password: fixed_str("relaymatrix"),
            ap_channel: 1,
            sta_ssid: String::new(),
            sta_password: String::new(),
            sta_connect_timeout_ms: 10_000,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            // Relays
            relay_count: 4,

            // Running mode
            running_speed_ms: 120,
            pattern: PatternId::RandomFast,
            auto_cycle: true,
            auto_cycle_interval_ms: 7_000,

            // Blitz mode
            blitz_on_ms: 2_000,
            blitz_off_ms: 2_000,

            // Timing
            control_loop_interval_ms: 10, // 100 Hz
            status_log_interval_secs: 60, // 1/min

            network: NetworkConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Copy with every numeric field pulled into its valid range.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();
        c.relay_count = clamp_relay_count(c.relay_count as i32);
        c.running_speed_ms = clamp_running_speed(c.running_speed_ms as i32);
        c.blitz_on_ms = clamp_blitz_ms(c.blitz_on_ms as i32);
        c.blitz_off_ms = clamp_blitz_ms(c.blitz_off_ms as i32);
        c.auto_cycle_interval_ms = c
            .auto_cycle_interval_ms
            .clamp(MIN_AUTO_CYCLE_MS, MAX_AUTO_CYCLE_MS);
        c.control_loop_interval_ms = c.control_loop_interval_ms.clamp(1, 100);
        c.status_log_interval_secs = c.status_log_interval_secs.clamp(5, 3600);
        c.network.ap_channel = c.network.ap_channel.clamp(1, 13);
        c.network.sta_connect_timeout_ms = c
            .network
            .sta_connect_timeout_ms
            .clamp(MIN_STA_TIMEOUT_MS, MAX_STA_TIMEOUT_MS);
        c
    }
}

// --- Clamps used by the HTTP surface ---

pub fn clamp_relay_count(v: i32) -> u8 {
    v.clamp(MIN_RELAYS as i32, MAX_RELAY_COUNT as i32) as u8
}

pub fn clamp_running_speed(v: i32) -> u16 {
    v.clamp(MIN_RUNNING_SPEED_MS as i32, MAX_RUNNING_SPEED_MS as i32) as u16
}

pub fn clamp_blitz_ms(v: i32) -> u16 {
    v.clamp(MIN_BLITZ_MS as i32, MAX_BLITZ_MS as i32) as u16
}

/// Build a fixed-capacity string, truncating at a char boundary.
pub fn fixed_str<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
