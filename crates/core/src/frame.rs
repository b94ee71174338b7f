//! Render input - a borrowed view of everything the screen shows

use std::collections::BTreeSet;

use crate::board::Board;
use crate::types::{GamePhase, Pos, Tile};

/// One frame's worth of game state. Renderers only read from it.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub board: &'a Board,
    pub hand: &'a [Tile],
    pub phase: GamePhase,
    pub score: u64,
    pub hints: u8,
    /// Cell picked by the first click of a swap
    pub selected: Option<Pos>,
    /// Hint highlight
    pub highlighted: &'a BTreeSet<Pos>,
}

impl Frame<'_> {
    pub fn is_selected(&self, pos: Pos) -> bool {
        self.selected == Some(pos)
    }

    pub fn is_highlighted(&self, pos: Pos) -> bool {
        self.highlighted.contains(&pos)
    }
}
