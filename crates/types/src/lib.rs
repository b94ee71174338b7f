//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! They are plain value types (tiles, coordinates, phases, input events) that
//! the engine, the persistence store and the terminal frontend all agree on.
//!
//! # Board Dimensions
//!
//! - **Grid**: 20x20 cells, row-major, `(row, col)` with `(0, 0)` at the top left
//! - **Tile set**: 34 kinds (9 ranks x 3 numbered suits + 7 honors), unlimited copies
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRID_SIZE` | 20 | Board side length |
//! | `HAND_MELD_CAP` | 12 | Hand size that ends meld collection |
//! | `HAND_WIN_SIZE` | 14 | Hand size of a complete (winning) hand |
//! | `BASE_WIN_SCORE` | 1000 | Points for any completed hand |
//! | `MAX_HINTS` | 10 | Hard ceiling of the hint wallet |
//! | `HINT_RECOVERY_SECS` | 18000 | One hint recovers every 5 hours |
//! | `MAX_RECOVERY_PER_CHECK` | 5 | Recovery cap per clock check |
//! | `HINT_SCORE_STEP` | 10000 | One hint per 10000 points crossed |
//!
//! # Examples
//!
//! ```
//! use mahjong_match_types::{Suit, Tile, Pos, GamePhase};
//!
//! let tile = Tile::new(Suit::Circles, 5).unwrap();
//! assert_eq!(tile.to_string(), "5p");
//! assert_eq!("5p".parse::<Tile>().unwrap(), tile);
//!
//! // Honors only go up to 7 (four winds, three dragons)
//! assert!(Tile::new(Suit::Honor, 8).is_none());
//!
//! assert!(Pos::new(3, 4).is_adjacent(Pos::new(3, 5)));
//! assert!(!Pos::new(3, 4).is_adjacent(Pos::new(4, 5)));
//!
//! assert_eq!(GamePhase::default(), GamePhase::CollectingMelds);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board side length (20x20 cells)
pub const GRID_SIZE: usize = 20;

/// Total number of cells on the board
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Number of distinct tile kinds
pub const TILE_KIND_COUNT: usize = 34;

/// Hand length at which meld collection stops and pair forming begins
pub const HAND_MELD_CAP: usize = 12;

/// Hand length of a completed hand
pub const HAND_WIN_SIZE: usize = 14;

/// Base points awarded for any completed hand
pub const BASE_WIN_SCORE: u64 = 1000;

/// Hint wallet ceiling
pub const MAX_HINTS: u8 = 10;

/// Hints granted to a brand new session
pub const INITIAL_HINTS: u8 = 3;

/// Seconds of wall-clock time per recovered hint (5 hours)
pub const HINT_RECOVERY_SECS: u64 = 5 * 60 * 60;

/// Most hints a single recovery check can grant
pub const MAX_RECOVERY_PER_CHECK: u8 = 5;

/// Score step that grants one extra hint
pub const HINT_SCORE_STEP: u64 = 10_000;

/// Pause after the swap is shown, before it is resolved or reverted
pub const SWAP_PAUSE_MS: u32 = 200;

/// Pause between removal, fall and refill steps
pub const CASCADE_PAUSE_MS: u32 = 300;

/// Tile family
///
/// Declaration order is the sort order of a hand:
/// characters, circles, bamboo, then honors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    /// Characters (man), ranks 1-9
    Characters,
    /// Circles (pin), ranks 1-9
    Circles,
    /// Bamboo (sou), ranks 1-9
    Bamboo,
    /// Honors: 1-4 winds (east, south, west, north), 5-7 dragons (white, green, red)
    Honor,
}

/// The three numbered suits
pub const NUMBERED_SUITS: [Suit; 3] = [Suit::Characters, Suit::Circles, Suit::Bamboo];

impl Suit {
    /// Highest valid rank in this suit
    pub fn max_rank(self) -> u8 {
        match self {
            Suit::Honor => 7,
            _ => 9,
        }
    }

    pub fn is_numbered(self) -> bool {
        self != Suit::Honor
    }

    /// Single-letter notation (m/p/s/z)
    pub fn letter(self) -> char {
        match self {
            Suit::Characters => 'm',
            Suit::Circles => 'p',
            Suit::Bamboo => 's',
            Suit::Honor => 'z',
        }
    }

    /// Parse notation letter (case-insensitive)
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'm' => Some(Suit::Characters),
            'p' => Some(Suit::Circles),
            's' => Some(Suit::Bamboo),
            'z' => Some(Suit::Honor),
            _ => None,
        }
    }

    /// Dense index 0..4
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A tile: suit plus rank
///
/// Plain value type. Two tiles are the same tile when suit and rank match;
/// there is no identity beyond that. Ordering is `(suit, rank)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tile {
    suit: Suit,
    rank: u8,
}

impl Tile {
    /// Create a tile, validating the rank for the suit
    pub fn new(suit: Suit, rank: u8) -> Option<Self> {
        if rank == 0 || rank > suit.max_rank() {
            return None;
        }
        Some(Self { suit, rank })
    }

    /// Const constructor for tile tables. Caller guarantees the rank is valid.
    const fn raw(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    pub fn suit(self) -> Suit {
        self.suit
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn is_honor(self) -> bool {
        self.suit == Suit::Honor
    }

    /// Rank 1 or 9 of a numbered suit
    pub fn is_terminal(self) -> bool {
        self.suit.is_numbered() && (self.rank == 1 || self.rank == 9)
    }

    pub fn is_terminal_or_honor(self) -> bool {
        self.is_honor() || self.is_terminal()
    }

    /// White, green or red dragon (honor ranks 5-7)
    pub fn is_dragon(self) -> bool {
        self.is_honor() && (5..=7).contains(&self.rank)
    }

    /// Dense kind index 0..34, matching [`ALL_TILE_KINDS`]
    pub fn kind_index(self) -> usize {
        self.suit.index() * 9 + (self.rank as usize - 1)
    }

    /// Inverse of [`Tile::kind_index`]
    pub fn from_kind_index(index: usize) -> Option<Self> {
        ALL_TILE_KINDS.get(index).copied()
    }

    /// The same suit, `delta` ranks higher (numbered suits only)
    pub fn successor(self, delta: u8) -> Option<Self> {
        if !self.suit.is_numbered() {
            return None;
        }
        Tile::new(self.suit, self.rank.checked_add(delta)?)
    }
}

const fn kind_table() -> [Tile; TILE_KIND_COUNT] {
    let mut out = [Tile::raw(Suit::Characters, 1); TILE_KIND_COUNT];
    let mut i = 0;
    while i < 9 {
        out[i] = Tile::raw(Suit::Characters, i as u8 + 1);
        out[9 + i] = Tile::raw(Suit::Circles, i as u8 + 1);
        out[18 + i] = Tile::raw(Suit::Bamboo, i as u8 + 1);
        i += 1;
    }
    let mut h = 0;
    while h < 7 {
        out[27 + h] = Tile::raw(Suit::Honor, h as u8 + 1);
        h += 1;
    }
    out
}

/// Every tile kind, in sort order
pub const ALL_TILE_KINDS: [Tile; TILE_KIND_COUNT] = kind_table();

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.letter())
    }
}

/// Failure to parse tile notation such as `"5m"`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTileError {
    #[error("tile notation must be two characters, got {0:?}")]
    Length(String),
    #[error("unknown suit letter {0:?}")]
    Suit(char),
    #[error("rank {rank} is not valid for suit {suit:?}")]
    Rank { suit: Suit, rank: u8 },
}

impl FromStr for Tile {
    type Err = ParseTileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(r), Some(l), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseTileError::Length(s.to_string()));
        };
        let suit = Suit::from_letter(l).ok_or(ParseTileError::Suit(l))?;
        let rank = r.to_digit(10).unwrap_or(0) as u8;
        Tile::new(suit, rank).ok_or(ParseTileError::Rank { suit, rank })
    }
}

impl TryFrom<String> for Tile {
    type Error = ParseTileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tile> for String {
    fn from(value: Tile) -> Self {
        value.to_string()
    }
}

/// A board cell: `None` only transiently, while a cascade is in flight
pub type Cell = Option<Tile>;

/// Board coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(self) -> bool {
        (self.row as usize) < GRID_SIZE && (self.col as usize) < GRID_SIZE
    }

    /// Row-major flat index (row * GRID_SIZE + col)
    pub fn index(self) -> usize {
        self.row as usize * GRID_SIZE + self.col as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CELL_COUNT {
            return None;
        }
        Some(Self::new((index / GRID_SIZE) as u8, (index % GRID_SIZE) as u8))
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        (self.row as i32 - other.row as i32).unsigned_abs()
            + (self.col as i32 - other.col as i32).unsigned_abs()
    }

    /// Orthogonal neighbours only (Manhattan distance exactly 1)
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }

    /// Step one cell in `dir`, or `None` at the grid edge
    pub fn step(self, dir: Direction) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = self.row as i16 + dr;
        let col = self.col as i16 + dc;
        if row < 0 || col < 0 || row >= GRID_SIZE as i16 || col >= GRID_SIZE as i16 {
            return None;
        }
        Some(Pos::new(row as u8, col as u8))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Two-phase round state
///
/// - **CollectingMelds**: swaps must form a triplet or sequence on the board
/// - **FormingPair**: the hand holds 12 tiles; only a swap that puts two
///   identical tiles side by side counts, and it completes the hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    CollectingMelds,
    FormingPair,
}

/// Cursor direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row delta, col delta)
    pub fn delta(self) -> (i16, i16) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Discrete player input, independent of the device that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A board cell was clicked
    Click(Pos),
    /// Move the keyboard cursor
    MoveCursor(Direction),
    /// Click whatever cell the keyboard cursor is on
    ClickCursor,
    /// Spend a hint to highlight every matchable cell
    Hint,
    /// Start over with a fresh session
    Reset,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table_is_sorted_and_complete() {
        assert_eq!(ALL_TILE_KINDS.len(), 34);
        for pair in ALL_TILE_KINDS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for (i, tile) in ALL_TILE_KINDS.iter().enumerate() {
            assert_eq!(tile.kind_index(), i);
            assert_eq!(Tile::from_kind_index(i), Some(*tile));
        }
        assert_eq!(ALL_TILE_KINDS.iter().filter(|t| t.is_honor()).count(), 7);
    }

    #[test]
    fn test_tile_predicates() {
        let m1 = Tile::new(Suit::Characters, 1).unwrap();
        let s9 = Tile::new(Suit::Bamboo, 9).unwrap();
        let p5 = Tile::new(Suit::Circles, 5).unwrap();
        let east = Tile::new(Suit::Honor, 1).unwrap();
        let red = Tile::new(Suit::Honor, 7).unwrap();

        assert!(m1.is_terminal() && s9.is_terminal());
        assert!(!p5.is_terminal_or_honor());
        assert!(east.is_terminal_or_honor() && !east.is_terminal());
        assert!(red.is_dragon() && !east.is_dragon());
        assert_eq!(p5.successor(2), Tile::new(Suit::Circles, 7));
        assert_eq!(s9.successor(1), None);
        assert_eq!(east.successor(1), None);
    }

    #[test]
    fn test_tile_notation() {
        for tile in ALL_TILE_KINDS {
            assert_eq!(tile.to_string().parse::<Tile>(), Ok(tile));
        }
        assert!(matches!("8z".parse::<Tile>(), Err(ParseTileError::Rank { .. })));
        assert!(matches!("0m".parse::<Tile>(), Err(ParseTileError::Rank { .. })));
        assert_eq!("5x".parse::<Tile>(), Err(ParseTileError::Suit('x')));
        assert!(matches!("10m".parse::<Tile>(), Err(ParseTileError::Length(_))));
    }

    #[test]
    fn test_pos_step_stays_in_grid() {
        let corner = Pos::new(0, 0);
        assert_eq!(corner.step(Direction::Up), None);
        assert_eq!(corner.step(Direction::Left), None);
        assert_eq!(corner.step(Direction::Right), Some(Pos::new(0, 1)));

        let last = Pos::new(GRID_SIZE as u8 - 1, GRID_SIZE as u8 - 1);
        assert_eq!(last.step(Direction::Down), None);
        assert_eq!(Pos::from_index(last.index()), Some(last));
        assert_eq!(Pos::from_index(CELL_COUNT), None);
    }
}
