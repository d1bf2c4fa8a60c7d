//! Relay output driver.
//!
//! Owns one [`OutputPin`] per relay channel and translates "energized /
//! released" into pin levels according to the module's [`Polarity`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF the pins are `PinDriver`s built by [`hw_init`](super::hw_init).
//! On host/test any `embedded-hal` output pin works, typically a mock
//! that records its level.

use embedded_hal::digital::{OutputPin, PinState};
use heapless::Vec;

use crate::error::RelayError;
use crate::pins::MAX_RELAYS;

/// Electrical polarity of a relay module input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Pin LOW energizes the relay (opto-isolated modules).
    ActiveLow,
    /// Pin HIGH energizes the relay (direct transistor drive).
    ActiveHigh,
}

impl Polarity {
    /// Pin level that puts a relay into the requested state.
    pub const fn level(self, energized: bool) -> PinState {
        match (self, energized) {
            (Self::ActiveLow, true) | (Self::ActiveHigh, false) => PinState::Low,
            (Self::ActiveLow, false) | (Self::ActiveHigh, true) => PinState::High,
        }
    }
}

pub struct RelayDriver<P> {
    pins: Vec<P, MAX_RELAYS>,
    polarity: Polarity,
    /// Last mask written to the pins; `None` until the first write so the
    /// first call drives every pin regardless of its reset level.
    written: Option<u8>,
}

impl<P: OutputPin> RelayDriver<P> {
    pub fn new(pins: Vec<P, MAX_RELAYS>, polarity: Polarity) -> Self {
        Self {
            pins,
            polarity,
            written: None,
        }
    }

    /// Number of physical channels wired to this driver.
    pub fn channels(&self) -> u8 {
        self.pins.len() as u8
    }

    /// Drive every channel from `states`; channels past the end of the
    /// slice are released.
    pub fn write(&mut self, states: &[bool]) -> Result<(), RelayError> {
        if states.len() > self.pins.len() {
            return Err(RelayError::NotEnoughPins {
                requested: states.len() as u8,
                available: self.channels(),
            });
        }

        let mask = states
            .iter()
            .enumerate()
            .fold(0u8, |m, (i, &on)| if on { m | (1 << i) } else { m });

        for (i, pin) in self.pins.iter_mut().enumerate() {
            let on = mask & (1 << i) != 0;
            let changed = self.written.is_none_or(|prev| (prev & (1 << i) != 0) != on);
            if changed {
                pin.set_state(self.polarity.level(on))
                    .map_err(|_| RelayError::GpioWriteFailed(i as u8))?;
            }
        }
        self.written = Some(mask);
        Ok(())
    }

    /// De-energize every channel.
    pub fn release_all(&mut self) -> Result<(), RelayError> {
        self.write(&[])
    }

    /// Bitmask of channels currently energized (as last written).
    pub fn energized_mask(&self) -> u8 {
        self.written.unwrap_or(0)
    }
}
