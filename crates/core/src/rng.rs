//! RNG module - deterministic tile draws
//!
//! Tiles are drawn uniformly from the 34 kinds, independently and with
//! replacement: there is no four-copies-per-kind wall as in table Mahjong.
//! The generator is a small LCG so that a seed reproduces the exact same
//! boards, refills and reshuffles (useful for tests and bug reports).

use crate::types::{Tile, ALL_TILE_KINDS, TILE_KIND_COUNT};

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
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Multiply-shift keeps the high bits; the low bits of an LCG cycle with
    /// a short period (bit 0 simply alternates), which would stripe the board.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Draw one tile kind uniformly at random
    pub fn draw_tile(&mut self) -> Tile {
        ALL_TILE_KINDS[self.next_range(TILE_KIND_COUNT as u32) as usize]
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}
