//! Fuzz target: `decode_config`
//!
//! Treats arbitrary bytes as the persisted settings blob.  Decoding must
//! never panic, and anything it accepts must already be in range.
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use relaymatrix::adapters::nvs::{decode_config, validate_config};

fuzz_target!(|data: &[u8]| {
    if let Ok(cfg) = decode_config(data) {
        assert_eq!(cfg, cfg.sanitized());
        // An empty AP name survives sanitizing; everything else must pass.
        if !cfg.network.ap_ssid.is_empty() {
            assert!(validate_config(&cfg).is_ok());
        }
    }
});
