//! Squirrel3 counter-based random number generator
//!
//! Every value is a pure function of `(seed, draw_count)`, so a generator can be
//! saved as two integers and resumed later with identical future draws. Save
//! files embed exactly this pair, so the mixing function below (constants and
//! 64-bit wrapping arithmetic included) must stay bit-for-bit stable.

use serde::{Deserialize, Serialize};

const NOISE1: i64 = 0xb529_7a4d;
const NOISE2: i64 = 0x68e3_1da4;
const NOISE3: i64 = 0x1b56_c4e9;
const CAP: i64 = 0xFFFF_FFFF;

/// Largest `f32` strictly below 1.0
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Source of uniformly distributed values in `[0, 1)`
///
/// Weighted selection draws through this trait so tests can script the exact
/// values a pick sees.
pub trait RandomSource {
    /// Returns the next value in `[0, 1)`
    fn next_f32(&mut self) -> f32;
}

/// Persisted generator state: the seed and how many draws have been made
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RngState {
    pub seed: i32,
    pub draw_count: i32,
}

impl RngState {
    pub fn new(seed: i32, draw_count: i32) -> Self {
        Self { seed, draw_count }
    }
}

/// Counter-based generator (Squirrel Eiserloh's "Squirrel3" noise)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Squirrel3 {
    seed: i32,
    draw_count: i32,
}

impl Squirrel3 {
    /// Create a generator with a fresh random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random::<i32>())
    }

    /// Create a generator with a fixed seed and no draws made
    pub fn with_seed(seed: i32) -> Self {
        Self::from_parts(seed, 0)
    }

    /// Resume a generator from a seed and draw count
    pub fn from_parts(seed: i32, draw_count: i32) -> Self {
        Self { seed, draw_count }
    }

    /// Resume a generator from persisted state
    pub fn from_state(state: RngState) -> Self {
        Self::from_parts(state.seed, state.draw_count)
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn draw_count(&self) -> i32 {
        self.draw_count
    }

    /// Export the current state for persistence
    pub fn state(&self) -> RngState {
        RngState::new(self.seed, self.draw_count)
    }

    /// Advance one draw and return a value in `[0, 1)`
    pub fn next_f32(&mut self) -> f32 {
        self.draw_count = self.draw_count.wrapping_add(1);
        let noise = mix(self.draw_count, self.seed);
        // u32 -> f32 rounds the top residues up to 2^32
        let value = noise as f32 / 4_294_967_296.0_f32;
        value.min(BELOW_ONE)
    }

    /// Integer in `[min, max)`, interpolated by the next draw and truncated toward zero
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        let value = lerp(min as f32, max as f32, self.next_f32());
        // f32 rounding can land the interpolation on `max` itself
        if min < max && value >= max as f32 {
            return max - 1;
        }
        value as i32
    }

    /// Float in `[min, max)`, interpolated by the next draw
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        let value = lerp(min, max, self.next_f32());
        if min < max && value >= max {
            return next_below(max);
        }
        value
    }
}

impl Default for Squirrel3 {
    fn default() -> Self {
        Self::new()
    }
}

impl From<RngState> for Squirrel3 {
    fn from(state: RngState) -> Self {
        Self::from_state(state)
    }
}

impl RandomSource for Squirrel3 {
    fn next_f32(&mut self) -> f32 {
        Squirrel3::next_f32(self)
    }
}

/// Mix a draw index with a seed into a value in `[0, 0xFFFFFFFF)`
///
/// Runs on 64-bit signed wrapping arithmetic with arithmetic shifts. The final
/// `x ^ (x >> 8)` always clears the sign bit, so the remainder is non-negative.
pub(crate) fn mix(draw: i32, seed: i32) -> u32 {
    let mut n = i64::from(draw);
    n = n.wrapping_mul(NOISE1);
    n = n.wrapping_add(i64::from(seed));
    n ^= n >> 8;
    n = n.wrapping_add(NOISE2);
    n ^= n.wrapping_shl(8);
    n = n.wrapping_mul(NOISE3);
    n ^= n >> 8;
    n.rem_euclid(CAP) as u32
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Largest `f32` strictly below a finite `x`
fn next_below(x: f32) -> f32 {
    if x == 0.0 {
        -f32::from_bits(1)
    } else if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}
