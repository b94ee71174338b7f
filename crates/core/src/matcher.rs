//! Board matcher - finds triplets and sequences on the grid
//!
//! Two kinds of search share one pure predicate ([`classify`]):
//!
//! - [`find_first_match`] scans the board and stops at the first three-cell
//!   group. Resolution only ever removes one group per step; chains pick up
//!   whatever is left on the next pass.
//! - [`has_any_valid_move`] and [`find_all_matchable_cells`] try every
//!   adjacent swap on a scratch copy of the board and ask
//!   [`find_first_match`] whether the swap would produce anything.
//!
//! Scan order is row-major. At each occupied cell the windows are tried as
//! horizontal triplet, vertical triplet, horizontal sequence, vertical
//! sequence. A window that runs off the grid or touches an empty cell is
//! skipped.

use std::collections::BTreeSet;

use crate::board::Board;
use crate::types::{GamePhase, Pos, Tile, GRID_SIZE};

/// Shape of a three-tile group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeldKind {
    /// Three identical tiles
    Triplet,
    /// Three consecutive ranks of one numbered suit
    Sequence,
}

/// Three aligned board cells forming a meld
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchGroup {
    pub cells: [Pos; 3],
    pub kind: MeldKind,
}

impl MatchGroup {
    /// The tiles currently under the group's cells (board order)
    pub fn tiles(&self, board: &Board) -> Option<[Tile; 3]> {
        Some([
            board.tile(self.cells[0])?,
            board.tile(self.cells[1])?,
            board.tile(self.cells[2])?,
        ])
    }
}

pub fn is_triplet(a: Tile, b: Tile, c: Tile) -> bool {
    a == b && b == c
}

/// Same numbered suit, ranks consecutive in any order. Honors never qualify.
pub fn is_sequence(a: Tile, b: Tile, c: Tile) -> bool {
    if a.is_honor() || a.suit() != b.suit() || b.suit() != c.suit() {
        return false;
    }
    let mut ranks = [a.rank(), b.rank(), c.rank()];
    ranks.sort_unstable();
    ranks[0] + 1 == ranks[1] && ranks[1] + 1 == ranks[2]
}

/// Classify three tiles, preferring triplet
pub fn classify(a: Tile, b: Tile, c: Tile) -> Option<MeldKind> {
    if is_triplet(a, b, c) {
        Some(MeldKind::Triplet)
    } else if is_sequence(a, b, c) {
        Some(MeldKind::Sequence)
    } else {
        None
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn window(origin: Pos, axis: Axis) -> Option<[Pos; 3]> {
    let (r, c) = (origin.row as usize, origin.col as usize);
    match axis {
        Axis::Horizontal if c + 2 < GRID_SIZE => Some([
            origin,
            Pos::new(origin.row, origin.col + 1),
            Pos::new(origin.row, origin.col + 2),
        ]),
        Axis::Vertical if r + 2 < GRID_SIZE => Some([
            origin,
            Pos::new(origin.row + 1, origin.col),
            Pos::new(origin.row + 2, origin.col),
        ]),
        _ => None,
    }
}

fn check_window(board: &Board, origin: Pos, axis: Axis, want: MeldKind) -> Option<MatchGroup> {
    let cells = window(origin, axis)?;
    let a = board.tile(cells[0])?;
    let b = board.tile(cells[1])?;
    let c = board.tile(cells[2])?;
    let hit = match want {
        MeldKind::Triplet => is_triplet(a, b, c),
        MeldKind::Sequence => is_sequence(a, b, c),
    };
    hit.then_some(MatchGroup { cells, kind: want })
}

/// First three-cell group on the board, or `None`
pub fn find_first_match(board: &Board) -> Option<MatchGroup> {
    const ORDER: [(Axis, MeldKind); 4] = [
        (Axis::Horizontal, MeldKind::Triplet),
        (Axis::Vertical, MeldKind::Triplet),
        (Axis::Horizontal, MeldKind::Sequence),
        (Axis::Vertical, MeldKind::Sequence),
    ];

    for row in 0..GRID_SIZE as u8 {
        for col in 0..GRID_SIZE as u8 {
            let origin = Pos::new(row, col);
            if board.tile(origin).is_none() {
                continue;
            }
            for (axis, kind) in ORDER {
                if let Some(group) = check_window(board, origin, axis, kind) {
                    return Some(group);
                }
            }
        }
    }
    None
}

/// Every adjacent cell pair, horizontal pairs first, then vertical
fn adjacent_pairs() -> impl Iterator<Item = (Pos, Pos)> {
    let n = GRID_SIZE as u8;
    let horizontal = (0..n).flat_map(move |r| (0..n - 1).map(move |c| (Pos::new(r, c), Pos::new(r, c + 1))));
    let vertical = (0..n - 1).flat_map(move |r| (0..n).map(move |c| (Pos::new(r, c), Pos::new(r + 1, c))));
    horizontal.chain(vertical)
}

/// Swaps (on a scratch board) that would produce a match
fn productive_swaps(board: &Board) -> impl Iterator<Item = (Pos, Pos)> + '_ {
    let mut scratch = board.clone();
    adjacent_pairs().filter(move |&(a, b)| {
        scratch.swap(a, b);
        let hit = find_first_match(&scratch).is_some();
        scratch.swap(a, b);
        hit
    })
}

/// Whether any single adjacent swap would produce a match
///
/// Always true while forming the pair: that phase has no deadlock, every swap
/// is judged directly by the resolution pipeline.
pub fn has_any_valid_move(board: &Board, phase: GamePhase) -> bool {
    if phase == GamePhase::FormingPair {
        return true;
    }
    productive_swaps(board).next().is_some()
}

/// Every cell that takes part in some productive swap (the hint highlight)
///
/// Empty while forming the pair.
pub fn find_all_matchable_cells(board: &Board, phase: GamePhase) -> BTreeSet<Pos> {
    let mut out = BTreeSet::new();
    if phase == GamePhase::FormingPair {
        return out;
    }
    for (a, b) in productive_swaps(board) {
        out.insert(a);
        out.insert(b);
    }
    out
}

/// All productive swaps, in scan order
pub fn valid_swaps(board: &Board) -> Vec<(Pos, Pos)> {
    productive_swaps(board).collect()
}
