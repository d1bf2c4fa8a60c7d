//! GPIO / peripheral pin assignments for the RelayMatrix board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! The board carries an 8-channel opto-isolated relay module.  Inputs on
//! that module are active-low: pulling a channel pin LOW energizes the coil.

use crate::drivers::relay::Polarity;

// ---------------------------------------------------------------------------
// Relay outputs (channel 1 … channel 8)
// ---------------------------------------------------------------------------

/// Maximum number of relay channels the board can drive.
pub const MAX_RELAYS: usize = 8;

/// GPIOs driving IN1 … IN8 of the relay module, in channel order.
///
/// All eight are output-capable and free of strapping functions on the
/// ESP32-WROOM-32, so they may be driven HIGH from reset without affecting
/// boot mode selection.
pub const RELAY_GPIOS: [i32; MAX_RELAYS] = [16, 17, 18, 19, 21, 22, 23, 25];

/// Electrical polarity of the relay module inputs.
pub const RELAY_POLARITY: Polarity = Polarity::ActiveLow;
