//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It does no terminal or filesystem I/O, and reads the wall clock only
//! through the [`Clock`] trait, making it:
//!
//! - **Deterministic**: Same seed produces identical boards and cascades
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`board`]: 20x20 tile grid with gravity, refill and shuffle
//! - [`matcher`]: triplet/sequence detection and swap probing (hints, deadlock)
//! - [`hand`]: the player's collected tiles
//! - [`scoring`]: pair + four melds decomposition and bonus scoring
//! - [`hints`]: the hint wallet and its time/score based recovery
//! - [`pipeline`]: step-by-step resolution of an accepted swap
//! - [`session`]: complete game state; the only entry point for mutation
//! - [`selection`]: two clicks into a swap request
//! - [`snapshot`]: persisted session state
//! - [`frame`]: what a renderer gets to see
//! - [`rng`]: seeded LCG for tile draws and shuffles
//!
//! # Game Rules
//!
//! - **Collecting melds**: swap two adjacent tiles; if a triplet or sequence
//!   forms it leaves the board and its tiles go into the hand. Otherwise the
//!   swap is undone.
//! - **Cascades**: holes fall to the top, get refilled, and any new match is
//!   removed in turn. A board without a valid move is reshuffled.
//! - **Forming the pair**: at 12 tiles only a swap that puts two identical
//!   tiles side by side counts. It completes the hand, which is scored and
//!   emptied for the next round.
//! - **Hints**: one unit reveals every cell taking part in a valid swap.
//!
//! # Example
//!
//! ```
//! use mahjong_match_core::{Session, SwapOutcome};
//! use mahjong_match_core::types::{GamePhase, Pos};
//!
//! let mut session = Session::new(12345, 0);
//! assert_eq!(session.phase(), GamePhase::CollectingMelds);
//!
//! // Non-adjacent cells are refused outright
//! assert!(session.swap(Pos::new(0, 0), Pos::new(2, 0)).is_none());
//!
//! // Adjacent swaps always resolve to a settled, full board
//! let report = session.swap(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
//! assert!(matches!(report.outcome, SwapOutcome::Reverted | SwapOutcome::Matched));
//! assert!(session.board().is_full());
//! ```

pub mod board;
pub mod frame;
pub mod hand;
pub mod hints;
pub mod matcher;
pub mod pipeline;
pub mod rng;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod snapshot;

pub use mahjong_match_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use frame::Frame;
pub use hand::Hand;
pub use hints::{Clock, FixedClock, HintWallet, SystemClock};
pub use matcher::{
    find_all_matchable_cells, find_first_match, has_any_valid_move, valid_swaps, MatchGroup,
    MeldKind,
};
pub use pipeline::{Resolution, Stage, SwapOutcome, SwapReport};
pub use rng::SimpleRng;
pub use scoring::{decompose, evaluate_hand, Bonus, Decomposition, Meld, ScoreResult};
pub use selection::{ClickResult, Selection};
pub use session::Session;
pub use snapshot::{SessionSnapshot, SnapshotError};
