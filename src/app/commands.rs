//! Inbound commands to the application service.
//!
//! These represent actions requested from the control page.  The HTTP
//! layer builds them from request paths, the control loop hands them to
//! [`RelayService::handle_command`](super::service::RelayService::handle_command).
//!
//! Numeric payloads are carried raw (as parsed from the query string);
//! the service clamps or ignores them.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCommand {
    /// Flip one relay.  Ignored unless `0 <= id < relay_count`.
    Toggle(i32),

    /// Switch every active relay on or off.
    SetAll(bool),

    /// Enter or leave running mode.
    ToggleRunning,

    /// Enter or leave blitz mode.
    ToggleBlitz,

    /// Running-mode step interval in milliseconds (clamped 40–500).
    SetSpeed(i32),

    /// Number of active relays (clamped 2–8).
    SetCount(i32),

    /// Pick a catalog pattern by index (wraps) and start running it.
    SelectPattern(i32),

    /// Enable or disable automatic stage switching.
    SetAutoCycle(bool),

    /// Blitz on/off phase lengths in milliseconds (each clamped 50–5000).
    SetBlitzTiming { on_ms: i32, off_ms: i32 },

    /// Persist the current settings on the next flush.
    SaveSettings,
}

impl RelayCommand {
    /// Plain-text acknowledgement returned to the HTTP client.
    pub fn ack(&self) -> &'static str {
        match self {
            Self::Toggle(_) => "OK",
            Self::SetAll(true) => "ON",
            Self::SetAll(false) => "OFF",
            Self::ToggleRunning => "RUN",
            Self::ToggleBlitz => "BLITZ",
            Self::SetSpeed(_) => "SPD",
            Self::SetCount(_) => "CNT",
            Self::SelectPattern(_) => "PAT",
            Self::SetAutoCycle(_) => "AUTO",
            Self::SetBlitzTiming { .. } => "BLZ",
            Self::SaveSettings => "SAVED",
        }
    }
}
