//! One-shot hardware peripheral initialization.
//!
//! Claims the relay GPIOs listed in [`pins::RELAY_GPIOS`], configures them
//! as push-pull outputs and releases every relay before the control loop
//! starts.  Called once from `main()`.

use log::info;

use crate::drivers::relay::RelayDriver;
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed { gpio: i32, rc: i32 },
    RelayReleaseFailed,
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed { gpio, rc } => {
                write!(f, "GPIO{} output config failed (rc={})", gpio, rc)
            }
            Self::RelayReleaseFailed => write!(f, "could not release relays at boot"),
        }
    }
}

// ── Relay outputs ─────────────────────────────────────────────

/// Concrete pin type driving one relay channel on the device.
#[cfg(target_os = "espidf")]
pub type RelayPin = PinDriver<'static, AnyOutputPin, Output>;

#[cfg(target_os = "espidf")]
pub fn init_relay_pins() -> Result<RelayDriver<RelayPin>, HwInitError> {
    let mut outputs = heapless::Vec::new();
    for &gpio in &pins::RELAY_GPIOS {
        // SAFETY: every GPIO in RELAY_GPIOS is claimed exactly once, here,
        // before any other driver is constructed.
        let pin = unsafe { AnyOutputPin::new(gpio) };
        let driver = PinDriver::output(pin).map_err(|e| HwInitError::GpioConfigFailed {
            gpio,
            rc: e.code(),
        })?;
        // RELAY_GPIOS has exactly MAX_RELAYS entries.
        let _ = outputs.push(driver);
    }

    let mut relays = RelayDriver::new(outputs, pins::RELAY_POLARITY);
    relays
        .release_all()
        .map_err(|_| HwInitError::RelayReleaseFailed)?;
    info!(
        "hw_init: {} relay outputs configured ({:?})",
        relays.channels(),
        pins::RELAY_POLARITY
    );
    Ok(relays)
}

/// Simulated output pin for host builds; accepts every level.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimPin;

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
pub type RelayPin = SimPin;

#[cfg(not(target_os = "espidf"))]
pub fn init_relay_pins() -> Result<RelayDriver<RelayPin>, HwInitError> {
    let mut outputs = heapless::Vec::new();
    for _ in &pins::RELAY_GPIOS {
        let _ = outputs.push(SimPin);
    }
    let mut relays = RelayDriver::new(outputs, pins::RELAY_POLARITY);
    relays
        .release_all()
        .map_err(|_| HwInitError::RelayReleaseFailed)?;
    info!(
        "hw_init(sim): {} simulated relay outputs on GPIO {:?}",
        relays.channels(),
        pins::RELAY_GPIOS
    );
    Ok(relays)
}
