//! Automatic stage switching while running mode is active.
//!
//! The playlist is every catalog pattern in order followed by one blitz
//! stage, then it wraps.  Each stage lasts `auto_cycle_interval_ms`.

use super::patterns::PatternId;
use crate::config::{MAX_AUTO_CYCLE_MS, MIN_AUTO_CYCLE_MS};

/// One entry of the show playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pattern(PatternId),
    Blitz,
}

const PLAYLIST_LEN: usize = PatternId::COUNT + 1;

fn stage_at(index: usize) -> Stage {
    if index < PatternId::COUNT {
        Stage::Pattern(PatternId::from_index(index))
    } else {
        Stage::Blitz
    }
}

pub struct AutoCycle {
    enabled: bool,
    interval_ms: u32,
    index: usize,
    stage_started_ms: Option<u32>,
}

impl AutoCycle {
    pub fn new(enabled: bool, interval_ms: u32) -> Self {
        Self {
            enabled,
            interval_ms: interval_ms.clamp(MIN_AUTO_CYCLE_MS, MAX_AUTO_CYCLE_MS),
            index: 0,
            stage_started_ms: None,
        }
    }

    /// Rewind the show to `pattern`; its timer starts on the next tick.
    pub fn restart(&mut self, pattern: PatternId) {
        self.index = pattern.index();
        self.stage_started_ms = None;
    }

    /// Give the current stage a full interval from the next tick.
    pub fn rearm(&mut self) {
        self.stage_started_ms = None;
    }

    pub fn stage(&self) -> Stage {
        stage_at(self.index)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.stage_started_ms = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Returns the new stage when the current one has run its course.
    pub fn tick(&mut self, now_ms: u32) -> Option<Stage> {
        if !self.enabled {
            return None;
        }
        match self.stage_started_ms {
            None => {
                self.stage_started_ms = Some(now_ms);
                None
            }
            Some(start) if now_ms.wrapping_sub(start) >= self.interval_ms => {
                self.index = (self.index + 1) % PLAYLIST_LEN;
                self.stage_started_ms = Some(now_ms);
                Some(self.stage())
            }
            Some(_) => None,
        }
    }
}
