//! Low-level peripheral drivers.

pub mod hw_init;
pub mod relay;
pub mod watchdog;
