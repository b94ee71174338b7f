//! Resolution pipeline - everything that happens after an accepted swap
//!
//! A [`Resolution`] is a small state machine the caller steps with
//! [`Resolution::advance`]. Each call performs one visible sub-step on the
//! session and returns the [`Stage`] it just completed, so a frontend can
//! draw the board and wait [`Stage::pause_ms`] before the next call. Headless
//! callers use [`Resolution::run_to_end`].
//!
//! ```text
//! Swapped ─┬─ Reverted ─────────────────────────────────────────┐
//!          └─ Removed | Won ─ FallenThrough ─ Refilled ─┐         │
//!                 ▲                                      │         │
//!                 └──── match found ── chain check ◄─────┘         │
//!                                         │ none                   │
//!                        ChainChecked ─ [Reshuffled ─ chain check] │
//!                                         │                        │
//!                                      Settled ◄───────────────────┘
//! ```
//!
//! Chain checks only run while collecting melds. Once the hand reaches 12
//! tiles the cascade settles straight after the refill.
//!
//! The session refuses new swaps and hint requests until the resolution has
//! returned [`Stage::Settled`].

use log::{debug, error, info, warn};

use crate::matcher::{find_first_match, has_any_valid_move, MatchGroup, MeldKind};
use crate::scoring::ScoreResult;
use crate::session::Session;
use crate::types::{GamePhase, Pos, Tile, CASCADE_PAUSE_MS, SWAP_PAUSE_MS};

/// Reshuffles allowed in a row before the cascade gives up and settles
const MAX_CONSECUTIVE_RESHUFFLES: u32 = 64;

/// How a swap ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapOutcome {
    /// Nothing formed; the tiles went back
    Reverted,
    /// A meld was removed from the board
    Matched,
    /// A pair completed the hand
    Won,
    /// A pair formed but the hand was not 12 tiles; swap undone, nothing scored
    WinAborted,
}

/// A completed sub-step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Swapped { a: Pos, b: Pos },
    Reverted,
    /// A meld left the board; `collected` if its tiles went into the hand
    Removed {
        group: MatchGroup,
        tiles: [Tile; 3],
        collected: bool,
    },
    Won(ScoreResult),
    FallenThrough { moved: usize },
    Refilled { filled: usize },
    /// The cascade ran out of matches
    ChainChecked { deadlocked: bool },
    Reshuffled,
    Settled(SwapOutcome),
}

impl Stage {
    /// How long a frontend should leave this stage on screen
    pub fn pause_ms(&self) -> u32 {
        match self {
            Stage::Swapped { .. } => SWAP_PAUSE_MS,
            Stage::Removed { .. }
            | Stage::Won(_)
            | Stage::FallenThrough { .. }
            | Stage::Refilled { .. }
            | Stage::Reshuffled => CASCADE_PAUSE_MS,
            Stage::Reverted | Stage::ChainChecked { .. } | Stage::Settled(_) => 0,
        }
    }
}

/// Summary of a fully resolved swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReport {
    pub outcome: SwapOutcome,
    /// Melds that went into the hand, in removal order
    pub melds: Vec<[Tile; 3]>,
    /// Removals triggered by refills rather than by the swap itself
    pub chains: u32,
    pub reshuffles: u32,
    pub win: Option<ScoreResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Swap,
    Evaluate,
    Fall,
    Refill,
    ChainCheck,
    Reshuffle,
    Settle(SwapOutcome),
    Done,
}

/// An in-flight swap resolution, created by [`Session::begin_swap`]
///
/// Must be advanced until it returns [`Stage::Settled`]; dropping it earlier
/// leaves the session busy.
#[derive(Debug, Clone)]
#[must_use = "a resolution does nothing until advanced to Settled"]
pub struct Resolution {
    a: Pos,
    b: Pos,
    next: Next,
    outcome: SwapOutcome,
    streak: u32,
    report: SwapReport,
}

impl Resolution {
    pub(crate) fn new(a: Pos, b: Pos) -> Self {
        Self {
            a,
            b,
            next: Next::Swap,
            outcome: SwapOutcome::Reverted,
            streak: 0,
            report: SwapReport {
                outcome: SwapOutcome::Reverted,
                melds: Vec::new(),
                chains: 0,
                reshuffles: 0,
                win: None,
            },
        }
    }

    pub fn cells(&self) -> (Pos, Pos) {
        (self.a, self.b)
    }

    pub fn is_done(&self) -> bool {
        self.next == Next::Done
    }

    /// What has happened so far
    pub fn report(&self) -> &SwapReport {
        &self.report
    }

    /// Perform the next sub-step; `None` once settled
    pub fn advance(&mut self, session: &mut Session) -> Option<Stage> {
        let stage = match self.next {
            Next::Swap => {
                session.clear_highlight();
                session.board_mut().swap(self.a, self.b);
                self.next = Next::Evaluate;
                Stage::Swapped { a: self.a, b: self.b }
            }
            Next::Evaluate => self.evaluate(session),
            Next::Fall => {
                let moved = session.board_mut().apply_gravity();
                self.next = Next::Refill;
                Stage::FallenThrough { moved }
            }
            Next::Refill => {
                let filled = session.refill_board();
                self.next = match session.phase() {
                    GamePhase::CollectingMelds => Next::ChainCheck,
                    GamePhase::FormingPair => Next::Settle(self.outcome),
                };
                Stage::Refilled { filled }
            }
            Next::ChainCheck => self.chain_check(session),
            Next::Reshuffle => {
                session.shuffle_board();
                self.streak += 1;
                self.report.reshuffles += 1;
                info!("board deadlocked, reshuffled (#{})", self.report.reshuffles);
                self.next = Next::ChainCheck;
                Stage::Reshuffled
            }
            Next::Settle(outcome) => {
                self.report.outcome = outcome;
                self.next = Next::Done;
                session.settle();
                debug!(
                    "swap {} <-> {} settled: {:?}, {} melds, {} chains",
                    self.a,
                    self.b,
                    outcome,
                    self.report.melds.len(),
                    self.report.chains
                );
                Stage::Settled(outcome)
            }
            Next::Done => return None,
        };
        Some(stage)
    }

    /// Drive to completion without pauses
    pub fn run_to_end(mut self, session: &mut Session) -> SwapReport {
        while self.advance(session).is_some() {}
        self.report
    }

    fn evaluate(&mut self, session: &mut Session) -> Stage {
        match session.phase() {
            GamePhase::FormingPair => {
                let board = session.board();
                match (board.tile(self.a), board.tile(self.b)) {
                    (Some(x), Some(y)) if x == y => self.win(session, x),
                    _ => self.revert(session, SwapOutcome::Reverted),
                }
            }
            GamePhase::CollectingMelds => match next_match(session) {
                Some((group, tiles)) => {
                    self.outcome = SwapOutcome::Matched;
                    self.remove(session, group, tiles)
                }
                None => self.revert(session, SwapOutcome::Reverted),
            },
        }
    }

    fn revert(&mut self, session: &mut Session, outcome: SwapOutcome) -> Stage {
        session.board_mut().swap(self.a, self.b);
        self.next = Next::Settle(outcome);
        Stage::Reverted
    }

    fn win(&mut self, session: &mut Session, tile: Tile) -> Stage {
        match session.complete_win(self.a, self.b, tile) {
            Ok(score) => {
                self.outcome = SwapOutcome::Won;
                self.report.win = Some(score.clone());
                self.next = Next::Fall;
                Stage::Won(score)
            }
            Err(len) => {
                error!(
                    "pair formed at {} / {} with a {}-tile hand; win aborted",
                    self.a, self.b, len
                );
                self.revert(session, SwapOutcome::WinAborted)
            }
        }
    }

    fn remove(&mut self, session: &mut Session, group: MatchGroup, tiles: [Tile; 3]) -> Stage {
        let collected = session.collect_meld(group, tiles);
        if collected {
            self.report.melds.push(tiles);
        }
        debug!(
            "{} {}{}{} at {} removed{}",
            match group.kind {
                MeldKind::Triplet => "triplet",
                MeldKind::Sequence => "sequence",
            },
            tiles[0],
            tiles[1],
            tiles[2],
            group.cells[0],
            if collected { " into hand" } else { "" }
        );
        self.streak = 0;
        self.next = Next::Fall;
        Stage::Removed {
            group,
            tiles,
            collected,
        }
    }

    fn chain_check(&mut self, session: &mut Session) -> Stage {
        if let Some((group, tiles)) = next_match(session) {
            self.report.chains += 1;
            return self.remove(session, group, tiles);
        }
        let deadlocked = !has_any_valid_move(session.board(), session.phase());
        self.next = if !deadlocked {
            Next::Settle(self.outcome)
        } else if self.streak >= MAX_CONSECUTIVE_RESHUFFLES {
            warn!("no valid move after {} reshuffles, settling anyway", self.streak);
            Next::Settle(self.outcome)
        } else {
            Next::Reshuffle
        };
        Stage::ChainChecked { deadlocked }
    }
}

/// First match on the session board, with the tiles it covers
fn next_match(session: &Session) -> Option<(MatchGroup, [Tile; 3])> {
    let group = find_first_match(session.board())?;
    Some((group, group.tiles(session.board())?))
}
