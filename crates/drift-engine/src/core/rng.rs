//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic and fast. Every random draw in the field goes through this,
//! so a fixed seed reproduces a whole session frame for frame.

use std::ops::Range;

/// Seedable pseudo-random number generator (xorshift64).
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random number in [0, upper_bound).
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        (self.next_u64() % upper_bound as u64) as u32
    }

    /// Uniform float in [0, 1). Uses the top 24 bits so the result is exact in f32.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }

    /// Uniform float in `[range.start, range.end)`.
    pub fn range(&mut self, range: Range<f32>) -> f32 {
        range.start + self.next_f32() * (range.end - range.start)
    }

    /// Uniform integer in `[lo, hi]`, both ends inclusive.
    pub fn int_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.next_int(hi - lo + 1)
    }

    /// Returns true with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}
