//! Logical relay state.
//!
//! [`RelayBank`] is the single record of which relays *should* be
//! energized.  It never touches pins; the service pushes its state to a
//! [`RelayPort`](crate::app::ports::RelayPort) after every change.

use crate::config::clamp_relay_count;
use crate::engine::patterns::full_mask;
use crate::pins::MAX_RELAYS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayBank {
    states: [bool; MAX_RELAYS],
    count: u8,
}

impl RelayBank {
    pub fn new(count: u8) -> Self {
        Self {
            states: [false; MAX_RELAYS],
            count: clamp_relay_count(count as i32),
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// Change the number of active channels.  Everything is released.
    pub fn set_count(&mut self, count: i32) -> u8 {
        self.count = clamp_relay_count(count);
        self.states = [false; MAX_RELAYS];
        self.count
    }

    pub fn is_on(&self, id: usize) -> bool {
        id < self.count as usize && self.states[id]
    }

    /// Flip one relay; ids outside the active range are ignored.
    pub fn toggle(&mut self, id: usize) -> bool {
        if id >= self.count as usize {
            return false;
        }
        self.states[id] = !self.states[id];
        true
    }

    pub fn set(&mut self, id: usize, on: bool) -> bool {
        if id >= self.count as usize {
            return false;
        }
        self.states[id] = on;
        true
    }

    pub fn all_on(&mut self) {
        self.states[..self.count as usize].fill(true);
    }

    pub fn all_off(&mut self) {
        self.states[..self.count as usize].fill(false);
    }

    /// Load a pattern frame; bits past the active count are dropped.
    pub fn apply_mask(&mut self, mask: u8) {
        let mask = mask & full_mask(self.count);
        for (i, state) in self.states.iter_mut().enumerate() {
            *state = mask & (1 << i) != 0;
        }
    }

    pub fn mask(&self) -> u8 {
        self.active()
            .iter()
            .enumerate()
            .fold(0u8, |m, (i, &on)| if on { m | (1 << i) } else { m })
    }

    /// States of the active channels only.
    pub fn active(&self) -> &[bool] {
        &self.states[..self.count as usize]
    }
}
