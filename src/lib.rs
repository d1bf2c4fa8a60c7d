//! RelayMatrix firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! firmware binary. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod inbox;
pub mod pins;
pub mod relay;

// The adapters and drivers carry cfg-gated simulation stubs so the crate
// builds and tests on the host.
pub mod adapters;
pub mod drivers;
