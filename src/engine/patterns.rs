//! Running-mode pattern engine.
//!
//! Each step produces a *frame*: a bitmask where bit `i` energizes relay
//! `i`.  The control loop calls [`PatternEngine::tick`] every iteration;
//! the engine only steps once `running_speed_ms` has elapsed, so the loop
//! never blocks on an animation.
//!
//! ## Catalog
//!
//! | #  | Pattern    | Frame rule for `n` relays                          |
//! |----|------------|----------------------------------------------------|
//! | 0  | RandomFast | one random relay                                   |
//! | 1  | PingPong   | one relay bouncing end to end                      |
//! | 2  | Snake      | a run of `max(2, n/2)` relays moving circularly    |
//! | 3  | Mirror     | two relays meeting in the centre and parting       |
//! | 4  | Wave       | fill up to `n`, drain back to 0                    |
//! | 5  | Chaos      | random non-empty subset                            |
//! | 6  | Shuffle    | one relay at a time in shuffled order, per lap     |
//! | 7  | Alternate  | even / odd relays                                  |
//! | 8  | Sequence   | fixed eight-frame table                            |

use serde::{Deserialize, Serialize};

use super::rng::XorShift32;
use crate::config::clamp_running_speed;
use crate::pins::MAX_RELAYS;

/// Pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternId {
    RandomFast,
    PingPong,
    Snake,
    Mirror,
    Wave,
    Chaos,
    Shuffle,
    Alternate,
    Sequence,
}

impl PatternId {
    pub const ALL: [PatternId; 9] = [
        PatternId::RandomFast,
        PatternId::PingPong,
        PatternId::Snake,
        PatternId::Mirror,
        PatternId::Wave,
        PatternId::Chaos,
        PatternId::Shuffle,
        PatternId::Alternate,
        PatternId::Sequence,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    /// Catalog entry at `i`, wrapping past the end.
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % Self::COUNT]
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RandomFast => "Random",
            Self::PingPong => "Ping-Pong",
            Self::Snake => "Snake",
            Self::Mirror => "Mirror",
            Self::Wave => "Wave",
            Self::Chaos => "Chaos",
            Self::Shuffle => "Shuffle",
            Self::Alternate => "Alternate",
            Self::Sequence => "Sequence",
        }
    }
}

/// Hand-coded frames for [`PatternId::Sequence`] (8-channel layout).
const SEQUENCE: [u8; 8] = [
    0b0000_0001,
    0b0000_0101,
    0b0001_0101,
    0b0101_0101,
    0b1010_1010,
    0b0010_1010,
    0b0000_1010,
    0b0000_0010,
];

/// Mask with the low `n` bits set.
pub const fn full_mask(n: u8) -> u8 {
    if n as usize >= MAX_RELAYS {
        0xFF
    } else {
        (1u8 << n) - 1
    }
}

/// Position `0..len` bouncing back and forth as `step` advances.
fn bounce(step: u32, len: u8) -> u8 {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (u32::from(len) - 1);
    let p = step % period;
    if p < u32::from(len) {
        p as u8
    } else {
        (period - p) as u8
    }
}

/// Running-mode pattern engine. Stack-allocated, no heap.
pub struct PatternEngine {
    pattern: PatternId,
    speed_ms: u16,
    step: u32,
    last_step_ms: Option<u32>,
    rng: XorShift32,
    order: [u8; MAX_RELAYS],
    order_pos: u8,
    /// Relay count `order` was shuffled for; 0 = needs a shuffle.
    order_len: u8,
}

impl PatternEngine {
    pub fn new(pattern: PatternId, speed_ms: u16, seed: u32) -> Self {
        Self {
            pattern,
            speed_ms: clamp_running_speed(speed_ms as i32),
            step: 0,
            last_step_ms: None,
            rng: XorShift32::new(seed),
            order: [0; MAX_RELAYS],
            order_pos: 0,
            order_len: 0,
        }
    }

    /// Switch pattern and restart it from its first frame.
    pub fn select(&mut self, pattern: PatternId) {
        self.pattern = pattern;
        self.reset();
    }

    /// Restart the current pattern; the next tick steps immediately.
    pub fn reset(&mut self) {
        self.step = 0;
        self.last_step_ms = None;
        self.order_len = 0;
    }

    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    pub fn set_speed(&mut self, speed_ms: u16) {
        self.speed_ms = clamp_running_speed(speed_ms as i32);
    }

    pub fn speed_ms(&self) -> u16 {
        self.speed_ms
    }

    /// Advance the pattern if a step is due.  Returns the new frame.
    pub fn tick(&mut self, now_ms: u32, count: u8) -> Option<u8> {
        if let Some(last) = self.last_step_ms {
            if now_ms.wrapping_sub(last) < u32::from(self.speed_ms) {
                return None;
            }
        }
        self.last_step_ms = Some(now_ms);

        let n = count.clamp(1, MAX_RELAYS as u8);
        let frame = self.frame(n) & full_mask(n);
        self.step = self.step.wrapping_add(1);
        Some(frame)
    }

    fn frame(&mut self, n: u8) -> u8 {
        let s = self.step;
        match self.pattern {
            PatternId::RandomFast => 1 << self.rng.below(u32::from(n)),
            PatternId::PingPong => 1 << bounce(s, n),
            PatternId::Snake => {
                let len = (n / 2).max(2);
                let head = (s % u32::from(n)) as u8;
                (0..len).fold(0u8, |m, k| m | 1 << ((head + n - k) % n))
            }
            PatternId::Mirror => {
                let i = bounce(s, n.div_ceil(2));
                (1 << i) | (1 << (n - 1 - i))
            }
            PatternId::Wave => {
                let period = 2 * u32::from(n);
                let p = s % period;
                let lit = if p <= u32::from(n) { p } else { period - p };
                ((1u16 << lit) - 1) as u8
            }
            PatternId::Chaos => {
                let m = (self.rng.next_u32() as u8) & full_mask(n);
                if m == 0 {
                    1 << self.rng.below(u32::from(n))
                } else {
                    m
                }
            }
            PatternId::Shuffle => {
                if self.order_len != n || self.order_pos >= n {
                    for (i, slot) in self.order.iter_mut().enumerate() {
                        *slot = i as u8;
                    }
                    self.rng.shuffle(&mut self.order[..n as usize]);
                    self.order_len = n;
                    self.order_pos = 0;
                }
                let relay = self.order[self.order_pos as usize];
                self.order_pos += 1;
                1 << relay
            }
            PatternId::Alternate => {
                if s % 2 == 0 {
                    0b0101_0101
                } else {
                    0b1010_1010
                }
            }
            PatternId::Sequence => SEQUENCE[(s % SEQUENCE.len() as u32) as usize],
        }
    }
}
