//! Persisted session state
//!
//! A snapshot is everything needed to resume a session: the board, the hand,
//! the phase, the score and the hint wallet. The RNG state and any hint
//! highlight are not stored; a resumed session reseeds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Cell, GamePhase, Tile, CELL_COUNT, HAND_MELD_CAP, HAND_WIN_SIZE, MAX_HINTS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("board has {0} cells, expected {n}", n = CELL_COUNT)]
    BoardSize(usize),
    #[error("board cell {0} is empty")]
    EmptyCell(usize),
    #[error("hand holds {0} tiles, more than {n}", n = HAND_WIN_SIZE)]
    HandTooLong(usize),
    #[error("hand holds {0} tiles while collecting melds, must be fewer than {n}", n = HAND_MELD_CAP)]
    HandOverMeldCap(usize),
    #[error("hand holds {0} tiles while collecting melds, not a whole number of melds")]
    PartialMeld(usize),
    #[error("hand holds {0} tiles while forming the pair, expected {n}", n = HAND_MELD_CAP)]
    PairWithoutMelds(usize),
    #[error("hint count {0} exceeds {n}", n = MAX_HINTS)]
    TooManyHints(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Row-major cells
    pub board: Vec<Cell>,
    pub hand: Vec<Tile>,
    pub score: u64,
    pub hints: u8,
    /// Unix seconds of the last time-based hint recovery
    pub last_recovery_secs: u64,
    #[serde(default)]
    pub phase: GamePhase,
}

impl SessionSnapshot {
    /// Check the invariants a settled session always holds
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.board.len() != CELL_COUNT {
            return Err(SnapshotError::BoardSize(self.board.len()));
        }
        if let Some(i) = self.board.iter().position(|c| c.is_none()) {
            return Err(SnapshotError::EmptyCell(i));
        }
        let len = self.hand.len();
        if len > HAND_WIN_SIZE {
            return Err(SnapshotError::HandTooLong(len));
        }
        match self.phase {
            GamePhase::CollectingMelds if len >= HAND_MELD_CAP => {
                return Err(SnapshotError::HandOverMeldCap(len));
            }
            GamePhase::CollectingMelds if len % 3 != 0 => {
                return Err(SnapshotError::PartialMeld(len));
            }
            GamePhase::FormingPair if len != HAND_MELD_CAP => {
                return Err(SnapshotError::PairWithoutMelds(len));
            }
            _ => {}
        }
        if self.hints > MAX_HINTS {
            return Err(SnapshotError::TooManyHints(self.hints));
        }
        Ok(())
    }
}
