//! Mock adapters for integration tests.
//!
//! Records every relay write and every emitted event so tests can assert
//! on the full history without touching real GPIO.

use relaymatrix::app::events::AppEvent;
use relaymatrix::app::ports::{ConfigError, ConfigPort, EventSink, RelayPort};
use relaymatrix::config::RelayConfig;
use relaymatrix::error::RelayError;

// ── MockRelays ────────────────────────────────────────────────

pub struct MockRelays {
    /// Bitmask after every write, oldest first.
    pub writes: Vec<u8>,
    /// When set, every write reports a GPIO failure on channel 0.
    pub fail: bool,
}

#[allow(dead_code)]
impl MockRelays {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            writes: Vec::new(),
            fail: true,
        }
    }

    /// Mask the pins currently show.
    pub fn mask(&self) -> u8 {
        self.writes.last().copied().unwrap_or(0)
    }
}

impl Default for MockRelays {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayPort for MockRelays {
    fn write(&mut self, states: &[bool]) -> Result<(), RelayError> {
        if self.fail {
            return Err(RelayError::GpioWriteFailed(0));
        }
        let mask = states
            .iter()
            .enumerate()
            .fold(0u8, |m, (i, &on)| if on { m | (1 << i) } else { m });
        self.writes.push(mask);
        Ok(())
    }

    fn channels(&self) -> u8 {
        8
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockConfigStore ───────────────────────────────────────────

pub struct MockConfigStore {
    pub saved: Option<RelayConfig>,
    pub saves: u32,
    pub fail: bool,
}

#[allow(dead_code)]
impl MockConfigStore {
    pub fn new() -> Self {
        Self {
            saved: None,
            saves: 0,
            fail: false,
        }
    }
}

impl Default for MockConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigPort for MockConfigStore {
    fn load(&self) -> Result<RelayConfig, ConfigError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, config: &RelayConfig) -> Result<(), ConfigError> {
        if self.fail {
            return Err(ConfigError::IoError);
        }
        self.saves += 1;
        self.saved = Some(config.clone());
        Ok(())
    }
}
