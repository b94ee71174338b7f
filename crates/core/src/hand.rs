//! Hand module - the player's collected tiles
//!
//! Melds taken off the board are appended three at a time until the hand
//! holds 12 tiles; the winning pair then brings it to 14. The hand is kept
//! sorted by (suit, rank) so meld decomposition is deterministic.

use arrayvec::ArrayVec;

use crate::types::{Tile, HAND_WIN_SIZE};

/// Up to 14 tiles, stack allocated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    tiles: ArrayVec<Tile, HAND_WIN_SIZE>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hand from tiles; `None` if there are more than 14
    pub fn from_tiles(tiles: &[Tile]) -> Option<Self> {
        let mut hand = Self::new();
        hand.push_all(tiles).then_some(hand)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Append all of `tiles`, or none of them if they would not fit
    pub fn push_all(&mut self, tiles: &[Tile]) -> bool {
        if self.tiles.remaining_capacity() < tiles.len() {
            return false;
        }
        self.tiles.extend(tiles.iter().copied());
        true
    }

    pub fn pop(&mut self) -> Option<Tile> {
        self.tiles.pop()
    }

    /// Sort by (suit, rank)
    pub fn sort(&mut self) {
        self.tiles.sort_unstable();
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}
