//! Hardware adapter — bridges the relay outputs to the domain port.
//!
//! Owns the [`RelayDriver`] and exposes it through [`RelayPort`].  This
//! is the only module in the system that drives relay pins.  On
//! non-espidf targets the pins are simulation stubs.

use embedded_hal::digital::OutputPin;

use crate::app::ports::RelayPort;
use crate::drivers::relay::RelayDriver;
use crate::error::RelayError;

/// Concrete adapter putting the relay driver behind [`RelayPort`].
pub struct HardwareAdapter<P> {
    relays: RelayDriver<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(relays: RelayDriver<P>) -> Self {
        Self { relays }
    }

    /// Bitmask of channels currently energized at the pins.
    pub fn energized_mask(&self) -> u8 {
        self.relays.energized_mask()
    }

    /// Release every channel (used before restarts).
    pub fn release_all(&mut self) -> Result<(), RelayError> {
        self.relays.release_all()
    }
}

impl<P: OutputPin> RelayPort for HardwareAdapter<P> {
    fn write(&mut self, states: &[bool]) -> Result<(), RelayError> {
        self.relays.write(states)
    }

    fn channels(&self) -> u8 {
        self.relays.channels()
    }
}
