//! Shared state between the HTTP server task and the control loop.
//!
//! ```text
//! ┌──────────────┐  RelayCommand   ┌──────────────┐
//! │  HTTP task   │───────────────▶│ Control Loop │
//! │ (esp-idf)    │◀───────────────│   (main)     │
//! └──────────────┘ StatusSnapshot  └──────────────┘
//! ```
//!
//! The command queue is a bounded `embassy-sync` channel; the status
//! board is a critical-section mutex around the latest snapshot.  Both
//! are statics so the HTTP handler closures need no captured state.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::commands::RelayCommand;
use crate::app::events::StatusSnapshot;

/// Commands that can wait for the control loop.
pub const INBOX_DEPTH: usize = 16;

/// Inbound commands: HTTP task → control loop.
static COMMANDS: Channel<CriticalSectionRawMutex, RelayCommand, INBOX_DEPTH> = Channel::new();

/// Latest snapshot published by the control loop.
static STATUS: Mutex<CriticalSectionRawMutex, Cell<StatusSnapshot>> =
    Mutex::new(Cell::new(StatusSnapshot::BOOT));

/// Queue a command for the control loop.
/// Returns `false` if the inbox is full (command dropped).
pub fn push_command(cmd: RelayCommand) -> bool {
    COMMANDS.try_send(cmd).is_ok()
}

/// Hand every pending command to `f`, oldest first.
/// Returns how many were handled.
pub fn drain_commands(mut f: impl FnMut(RelayCommand)) -> usize {
    let mut handled = 0;
    while let Ok(cmd) = COMMANDS.try_receive() {
        f(cmd);
        handled += 1;
    }
    handled
}

pub fn publish_status(snapshot: StatusSnapshot) {
    STATUS.lock(|s| s.set(snapshot));
}

pub fn latest_status() -> StatusSnapshot {
    STATUS.lock(Cell::get)
}
