//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART in production).

use log::info;

use crate::app::events::{AppEvent, StatusSnapshot};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// `STATUS` line body, e.g. `mode=running relays=4 mask=0b00000101 ...`.
pub fn format_status(s: &StatusSnapshot) -> String {
    format!(
        "mode={} relays={} mask=0b{:08b} pattern={}{} speed={}ms blitz={}/{}ms auto={} up={}s",
        s.mode.name(),
        s.relay_count,
        s.relays,
        s.pattern.name(),
        if s.show_blitz { "(blitz)" } else { "" },
        s.running_speed_ms,
        s.blitz_on_ms,
        s.blitz_off_ms,
        if s.auto_cycle { "on" } else { "off" },
        s.uptime_ms / 1000,
    )
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(s) => info!("STATUS | {}", format_status(s)),
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from.name(), to.name());
            }
            AppEvent::PatternChanged(p) => info!("PATTERN | {}", p.name()),
            AppEvent::ShowBlitz => info!("PATTERN | blitz stage"),
            AppEvent::RelayCountChanged(n) => info!("RELAYS | count={}", n),
            AppEvent::SettingsSaved => info!("SETTINGS | saved"),
            AppEvent::Started(mode) => info!("START | mode={}", mode.name()),
        }
    }
}
