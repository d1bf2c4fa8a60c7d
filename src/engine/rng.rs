//! Small deterministic PRNG for the random patterns.
//!
//! xorshift32: one word of state, no heap, no libm.  The seed comes from
//! the hardware RNG on the device (see `adapters::entropy`) and is fixed
//! in tests so frames are reproducible.

pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        // Zero is the one fixed point of xorshift.
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform-ish value in `0..bound`.  `bound` must be non-zero.
    pub fn below(&mut self, bound: u32) -> u32 {
        // Multiply-shift keeps the bias negligible for bound <= 256.
        ((u64::from(self.next_u32()) * u64::from(bound)) >> 32) as u32
    }

    /// Fisher–Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}
