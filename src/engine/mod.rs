//! Relay animation engines.
//!
//! Pure timing logic: every engine is fed the current uptime in
//! milliseconds and answers with what the relays should do next.  None of
//! them touch hardware or block.

pub mod blitz;
pub mod patterns;
pub mod rng;
pub mod show;
