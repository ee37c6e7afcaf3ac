//! RNG module - seedable gem source for population and refill
//!
//! A simple LCG keeps the whole resolution pipeline reproducible from a
//! single seed, which the determinism tests rely on. Production callers may
//! seed from the clock; the sequence is the only source of randomness in
//! the crate.
//!
//! `GemSource` is the pluggable draw interface: the bounded
//! `next_avoiding_match` retry is a soft constraint - after the attempt
//! budget it accepts whatever was drawn last, which is an expected outcome
//! and never an error.

use crate::core::grid::Grid;
use crate::core::matches::would_match_at;
use crate::types::{GemKind, MatchKey, REFILL_MAX_ATTEMPTS};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Current internal state (for restarting a session with the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Supplies gem kinds for initial population and refill
pub trait GemSource {
    /// Draw the next kind from the palette
    fn next_kind(&mut self, palette: &[GemKind]) -> GemKind;

    /// Draw a kind that does not complete a run at (col, row), retrying up
    /// to `REFILL_MAX_ATTEMPTS` times. Exhausting the budget accepts the
    /// last draw - a near-miss is allowed, not an error.
    fn next_avoiding_match(
        &mut self,
        grid: &Grid,
        col: u8,
        row: u8,
        palette: &[GemKind],
    ) -> GemKind {
        let mut kind = self.next_kind(palette);
        let mut attempts = 1;
        while attempts < REFILL_MAX_ATTEMPTS
            && would_match_at(grid, col as i16, row as i16, MatchKey::plain(kind))
        {
            kind = self.next_kind(palette);
            attempts += 1;
        }
        kind
    }
}

/// Production gem source backed by the seedable LCG
#[derive(Debug, Clone)]
pub struct RandomGemSource {
    rng: SimpleRng,
}

impl RandomGemSource {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Current RNG state, exported as the session seed
    pub fn state(&self) -> u32 {
        self.rng.state()
    }
}

impl GemSource for RandomGemSource {
    fn next_kind(&mut self, palette: &[GemKind]) -> GemKind {
        let idx = self.rng.next_range(palette.len() as u32) as usize;
        palette[idx]
    }
}
