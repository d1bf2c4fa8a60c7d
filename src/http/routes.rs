//! Request path → [`Route`] mapping.
//!
//! Pure string handling so it runs (and fuzzes) on the host.  The
//! ESP-IDF handler in [`adapters::http_server`](crate::adapters) only
//! forwards the raw URI here.
//!
//! Numeric arguments use leading-integer semantics: optional leading
//! whitespace and sign, then digits up to the first non-digit.  Missing
//! or unparsable values read as 0, and the service clamps from there.

use crate::app::commands::RelayCommand;

/// What a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The HTML control panel.
    Page,
    /// JSON status snapshot.
    Status,
    /// Something for the control loop.
    Command(RelayCommand),
}

/// Paths served by the control panel, in registration order.
pub const PATHS: [&str; 17] = [
    "/", "/status", "/relay", "/toggle", "/all", "/allon", "/alloff", "/run", "/blitz", "/speed",
    "/runspeed", "/count", "/set", "/pattern", "/auto", "/blitzspeed", "/save",
];

/// Map a request URI (path plus optional query) to its route.
/// Returns `None` for unknown paths.
pub fn parse_request(uri: &str) -> Option<Route> {
    let (path, query) = match uri.split_once('?') {
        Some((p, q)) => (p, q),
        None => (uri, ""),
    };
    let arg = |key: &str| to_int(query_param(query, key).unwrap_or(""));

    let cmd = match path {
        "/" => return Some(Route::Page),
        "/status" => return Some(Route::Status),
        "/relay" | "/toggle" => RelayCommand::Toggle(arg("id")),
        "/all" => RelayCommand::SetAll(arg("x") != 0),
        "/allon" => RelayCommand::SetAll(true),
        "/alloff" => RelayCommand::SetAll(false),
        "/run" => RelayCommand::ToggleRunning,
        "/blitz" => RelayCommand::ToggleBlitz,
        "/speed" | "/runspeed" => RelayCommand::SetSpeed(arg("v")),
        "/count" => RelayCommand::SetCount(arg("v")),
        "/set" => RelayCommand::SetCount(arg("ch")),
        "/pattern" => RelayCommand::SelectPattern(arg("p")),
        "/auto" => RelayCommand::SetAutoCycle(arg("x") != 0),
        "/blitzspeed" => RelayCommand::SetBlitzTiming {
            on_ms: arg("on"),
            off_ms: arg("off"),
        },
        "/save" => RelayCommand::SaveSettings,
        _ => return None,
    };
    Some(Route::Command(cmd))
}

/// Value of the first `key=value` pair in a query string.
pub fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// Leading-integer parse; saturates instead of overflowing.
pub fn to_int(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
