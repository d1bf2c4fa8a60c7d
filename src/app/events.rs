//! Outbound application events.
//!
//! The [`RelayService`](super::service::RelayService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log today).

use serde::Serialize;

use crate::engine::patterns::PatternId;

/// What drives the relays right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    /// Relays only change on explicit commands.
    Manual,
    /// Pattern animation, optionally auto-cycling through the show.
    Running,
    /// All active relays flash together.
    Blitz,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Running => "running",
            Self::Blitz => "blitz",
        }
    }
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial mode).
    Started(Mode),

    /// Operating mode changed.
    ModeChanged { from: Mode, to: Mode },

    /// A pattern became active, either picked or reached by the show.
    PatternChanged(PatternId),

    /// The show reached its blitz stage.
    ShowBlitz,

    /// Active relay count changed.
    RelayCountChanged(u8),

    /// Settings were written to persistent storage.
    SettingsSaved,

    /// Periodic status snapshot.
    Status(StatusSnapshot),
}

/// Point-in-time view of the controller, served as JSON on `/status`
/// and used to render the control page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub mode: Mode,
    pub relay_count: u8,
    /// Bit `i` set when relay `i` is energized.
    pub relays: u8,
    pub pattern: PatternId,
    /// True while the show sits on its blitz stage.
    pub show_blitz: bool,
    pub running_speed_ms: u16,
    pub blitz_on_ms: u16,
    pub blitz_off_ms: u16,
    pub auto_cycle: bool,
    pub uptime_ms: u32,
}

impl StatusSnapshot {
    /// Placeholder published before the control loop's first iteration.
    pub const BOOT: Self = Self {
        mode: Mode::Manual,
        relay_count: 4,
        relays: 0,
        pattern: PatternId::RandomFast,
        show_blitz: false,
        running_speed_ms: 120,
        blitz_on_ms: 2000,
        blitz_off_ms: 2000,
        auto_cycle: true,
        uptime_ms: 0,
    };

    pub fn is_relay_on(&self, id: usize) -> bool {
        id < usize::from(self.relay_count) && self.relays & (1 << id) != 0
    }
}
