//! Blitz mode: every active relay flashes together.
//!
//! Square wave with separately adjustable on / off phases.  Like the
//! pattern engine it only looks at elapsed time, it never sleeps.

use crate::config::clamp_blitz_ms;

pub struct BlitzEngine {
    on_ms: u16,
    off_ms: u16,
    flash: bool,
    last_toggle_ms: Option<u32>,
}

impl BlitzEngine {
    pub fn new(on_ms: u16, off_ms: u16) -> Self {
        Self {
            on_ms: clamp_blitz_ms(on_ms as i32),
            off_ms: clamp_blitz_ms(off_ms as i32),
            flash: false,
            last_toggle_ms: None,
        }
    }

    /// Start over from the dark phase; the next tick flashes on.
    pub fn reset(&mut self) {
        self.flash = false;
        self.last_toggle_ms = None;
    }

    pub fn set_timing(&mut self, on_ms: u16, off_ms: u16) {
        self.on_ms = clamp_blitz_ms(on_ms as i32);
        self.off_ms = clamp_blitz_ms(off_ms as i32);
    }

    pub fn timing(&self) -> (u16, u16) {
        (self.on_ms, self.off_ms)
    }

    pub fn is_on(&self) -> bool {
        self.flash
    }

    /// Returns `Some(on)` when the flash phase changed.
    pub fn tick(&mut self, now_ms: u32) -> Option<bool> {
        if let Some(last) = self.last_toggle_ms {
            let phase = if self.flash { self.on_ms } else { self.off_ms };
            if now_ms.wrapping_sub(last) < u32::from(phase) {
                return None;
            }
        }
        self.last_toggle_ms = Some(now_ms);
        self.flash = !self.flash;
        Some(self.flash)
    }
}
