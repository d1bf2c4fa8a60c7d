//! Fuzz target: `parse_request`
//!
//! Feeds arbitrary UTF-8 request URIs into the route table and checks
//! that parsing never panics and that every recognised path is one the
//! server registers.
//!
//! cargo fuzz run fuzz_route_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use relaymatrix::http::routes::{PATHS, parse_request, to_int};

fuzz_target!(|data: &[u8]| {
    let Ok(uri) = core::str::from_utf8(data) else {
        return;
    };

    let _ = to_int(uri);

    if parse_request(uri).is_some() {
        let path = uri.split_once('?').map_or(uri, |(p, _)| p);
        assert!(PATHS.contains(&path), "routed unregistered path {path:?}");
    }
});
