//! Session module - the complete state of one player's game
//!
//! Ties together board, hand, phase, score, hint wallet and RNG. All mutation
//! of a running game goes through here: swaps (as a [`Resolution`] the caller
//! steps through), hint requests, hint recovery and reset.

use std::collections::BTreeSet;

use log::{debug, info};

use crate::board::Board;
use crate::frame::Frame;
use crate::hand::Hand;
use crate::hints::HintWallet;
use crate::matcher::{find_all_matchable_cells, find_first_match, has_any_valid_move, MatchGroup};
use crate::pipeline::{Resolution, SwapReport};
use crate::rng::SimpleRng;
use crate::scoring::{evaluate_hand, ScoreResult};
use crate::snapshot::{SessionSnapshot, SnapshotError};
use crate::types::{GamePhase, Pos, Tile, HAND_MELD_CAP, HAND_WIN_SIZE, INITIAL_HINTS};

#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    hand: Hand,
    phase: GamePhase,
    score: u64,
    wallet: HintWallet,
    /// Cells shown by the last hint; cleared by the next accepted swap
    highlighted: BTreeSet<Pos>,
    rng: SimpleRng,
    /// A resolution is in flight
    busy: bool,
}

impl Session {
    /// Start a fresh game
    ///
    /// The board has no ready-made match and at least one valid move.
    pub fn new(seed: u32, now_secs: u64) -> Self {
        let mut rng = SimpleRng::new(seed);
        let board = fresh_board(&mut rng);
        Self {
            board,
            hand: Hand::new(),
            phase: GamePhase::CollectingMelds,
            score: 0,
            wallet: HintWallet::new(INITIAL_HINTS, now_secs),
            highlighted: BTreeSet::new(),
            rng,
            busy: false,
        }
    }

    /// A session over a prepared board and hand, with a zero score and the
    /// initial hint allowance. Used to set up specific positions.
    pub fn with_board(board: Board, hand: Hand, phase: GamePhase, seed: u32) -> Self {
        Self {
            board,
            hand,
            phase,
            score: 0,
            wallet: HintWallet::new(INITIAL_HINTS, 0),
            highlighted: BTreeSet::new(),
            rng: SimpleRng::new(seed),
            busy: false,
        }
    }

    /// Resume from a persisted snapshot
    pub fn from_snapshot(snapshot: &SessionSnapshot, seed: u32) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        let board = Board::from_cells(&snapshot.board)
            .ok_or(SnapshotError::BoardSize(snapshot.board.len()))?;
        let mut hand =
            Hand::from_tiles(&snapshot.hand).ok_or(SnapshotError::HandTooLong(snapshot.hand.len()))?;
        hand.sort();
        Ok(Self {
            board,
            hand,
            phase: snapshot.phase,
            score: snapshot.score,
            wallet: HintWallet::new(snapshot.hints, snapshot.last_recovery_secs),
            highlighted: BTreeSet::new(),
            rng: SimpleRng::new(seed),
            busy: false,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.cells().to_vec(),
            hand: self.hand.tiles().to_vec(),
            score: self.score,
            hints: self.wallet.count(),
            last_recovery_secs: self.wallet.last_recovery_secs(),
            phase: self.phase,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn hints(&self) -> u8 {
        self.wallet.count()
    }

    pub fn wallet(&self) -> &HintWallet {
        &self.wallet
    }

    pub fn highlighted(&self) -> &BTreeSet<Pos> {
        &self.highlighted
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Everything a renderer needs for one frame
    pub fn frame(&self, selected: Option<Pos>) -> Frame<'_> {
        Frame {
            board: &self.board,
            hand: self.hand.tiles(),
            phase: self.phase,
            score: self.score,
            hints: self.wallet.count(),
            selected,
            highlighted: &self.highlighted,
        }
    }

    /// Accept a swap request
    ///
    /// Returns `None` (and changes nothing) unless both cells are on the board,
    /// orthogonally adjacent, and no other resolution is in flight. The session
    /// stays busy until the returned [`Resolution`] has been advanced to
    /// [`Stage::Settled`](crate::pipeline::Stage::Settled).
    #[must_use = "the session stays busy until the resolution is driven to Settled"]
    pub fn begin_swap(&mut self, a: Pos, b: Pos) -> Option<Resolution> {
        if self.busy || !a.in_bounds() || !b.in_bounds() || !a.is_adjacent(b) {
            return None;
        }
        self.busy = true;
        Some(Resolution::new(a, b))
    }

    /// Accept and fully resolve a swap
    pub fn swap(&mut self, a: Pos, b: Pos) -> Option<SwapReport> {
        let resolution = self.begin_swap(a, b)?;
        Some(resolution.run_to_end(self))
    }

    /// Spend a hint to highlight every cell that takes part in a valid swap
    ///
    /// No-op (returns false) with an empty wallet, while forming the pair,
    /// while a highlight is already showing, or mid-resolution.
    pub fn request_hint(&mut self) -> bool {
        if self.busy || self.phase == GamePhase::FormingPair || !self.highlighted.is_empty() {
            return false;
        }
        if !self.wallet.spend() {
            return false;
        }
        self.highlighted = find_all_matchable_cells(&self.board, self.phase);
        info!(
            "hint used: {} cells highlighted, {} hints left",
            self.highlighted.len(),
            self.wallet.count()
        );
        true
    }

    /// Time-based hint recovery; returns how many were granted
    pub fn recover_hints(&mut self, now_secs: u64) -> u8 {
        let granted = self.wallet.recover(now_secs);
        if granted > 0 {
            info!("recovered {} hints, now {}", granted, self.wallet.count());
        }
        granted
    }

    /// Start over with a fresh board, an empty hand and a zero score.
    /// The hint wallet carries across and gets a recovery check at `now_secs`.
    /// Refused mid-resolution.
    pub fn reset(&mut self, now_secs: u64) -> bool {
        if self.busy {
            return false;
        }
        let seed = self.rng.next_u32();
        let wallet = self.wallet;
        *self = Self::new(seed, now_secs);
        self.wallet = wallet;
        self.recover_hints(now_secs);
        info!("session reset, {} hints kept", self.wallet.count());
        true
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn clear_highlight(&mut self) {
        self.highlighted.clear();
    }

    pub(crate) fn refill_board(&mut self) -> usize {
        self.board.refill(&mut self.rng)
    }

    pub(crate) fn shuffle_board(&mut self) {
        self.board.shuffle(&mut self.rng);
    }

    pub(crate) fn settle(&mut self) {
        self.busy = false;
    }

    /// Take a meld off the board, collecting its tiles while the hand has room.
    /// Returns whether the tiles went into the hand.
    pub(crate) fn collect_meld(&mut self, group: MatchGroup, tiles: [Tile; 3]) -> bool {
        let collected = self.phase == GamePhase::CollectingMelds
            && self.hand.len() < HAND_MELD_CAP
            && self.hand.push_all(&tiles);
        if collected {
            self.hand.sort();
        }
        for pos in group.cells {
            self.board.take(pos);
        }
        if self.phase == GamePhase::CollectingMelds && self.hand.len() >= HAND_MELD_CAP {
            self.phase = GamePhase::FormingPair;
            info!("hand has {} tiles, forming pair", self.hand.len());
        }
        collected
    }

    /// Add the winning pair, score the hand and start a new round
    ///
    /// Fails with the hand length the pair would have produced if that is not
    /// 14; hand and board are left as they were.
    pub(crate) fn complete_win(&mut self, a: Pos, b: Pos, tile: Tile) -> Result<ScoreResult, usize> {
        let len = self.hand.len() + 2;
        if len != HAND_WIN_SIZE || !self.hand.push_all(&[tile, tile]) {
            return Err(len);
        }
        self.hand.sort();
        let result = evaluate_hand(self.hand.tiles());

        let old = self.score;
        self.score = self.score.saturating_add(result.total);
        let awarded = self.wallet.award_for_score(old, self.score);
        info!(
            "hand complete: +{} ({}), score {}, {} hints awarded",
            result.total,
            result
                .bonuses
                .iter()
                .map(|b| b.name())
                .collect::<Vec<_>>()
                .join(", "),
            self.score,
            awarded
        );

        self.hand.clear();
        self.phase = GamePhase::CollectingMelds;
        self.board.take(a);
        self.board.take(b);
        Ok(result)
    }
}

/// Random board with every ready-made match drawn away and at least one move
fn fresh_board(rng: &mut SimpleRng) -> Board {
    let mut board = Board::random(rng);
    loop {
        let mut redrawn = 0;
        while let Some(group) = find_first_match(&board) {
            for pos in group.cells {
                board.take(pos);
            }
            board.refill(rng);
            redrawn += 1;
        }
        if redrawn > 0 {
            debug!("fresh board: redrew {} initial matches", redrawn);
        }
        if has_any_valid_move(&board, GamePhase::CollectingMelds) {
            return board;
        }
        board.shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SwapOutcome;
    use crate::types::{Suit, CELL_COUNT, HINT_RECOVERY_SECS};

    fn t(s: &str) -> Tile {
        s.parse().unwrap()
    }

    fn tiles(s: &str) -> Vec<Tile> {
        s.split_whitespace().map(t).collect()
    }

    fn dead_board() -> Board {
        Board::from_fn(|p| Tile::new(Suit::Honor, ((p.row as usize + 2 * p.col as usize) % 7) as u8 + 1))
    }

    #[test]
    fn test_new_session_is_playable() {
        for seed in [1, 2, 3, 12345] {
            let session = Session::new(seed, 500);
            assert!(session.board().is_full());
            assert_eq!(find_first_match(session.board()), None);
            assert!(has_any_valid_move(session.board(), GamePhase::CollectingMelds));
            assert_eq!(session.hints(), INITIAL_HINTS);
            assert_eq!(session.wallet().last_recovery_secs(), 500);
            assert_eq!(session.phase(), GamePhase::CollectingMelds);
            assert!(session.hand().is_empty());
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        assert_eq!(Session::new(42, 0).board(), Session::new(42, 0).board());
        assert_ne!(Session::new(42, 0).board(), Session::new(43, 0).board());
    }

    #[test]
    fn test_begin_swap_rejects_bad_pairs() {
        let mut session = Session::new(1, 0);
        let before = session.board().clone();
        assert!(session.begin_swap(Pos::new(0, 0), Pos::new(1, 1)).is_none());
        assert!(session.begin_swap(Pos::new(0, 0), Pos::new(0, 2)).is_none());
        assert!(session.begin_swap(Pos::new(0, 0), Pos::new(0, 0)).is_none());
        assert!(session.begin_swap(Pos::new(19, 19), Pos::new(19, 20)).is_none());
        assert_eq!(session.board(), &before);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_busy_session_refuses_input() {
        let mut session = Session::new(1, 0);
        let mut res = session.begin_swap(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
        assert!(session.begin_swap(Pos::new(5, 5), Pos::new(5, 6)).is_none());
        assert!(!session.request_hint());
        assert!(!session.reset(0));
        assert_eq!(session.hints(), INITIAL_HINTS);
        while res.advance(&mut session).is_some() {}
        assert!(!session.is_busy());
        assert!(session.begin_swap(Pos::new(5, 5), Pos::new(5, 6)).is_some());
    }

    #[test]
    fn test_hint_spends_and_highlights_once() {
        let mut session = Session::new(3, 0);
        assert!(session.request_hint());
        assert_eq!(session.hints(), INITIAL_HINTS - 1);
        assert!(!session.highlighted().is_empty());
        let shown = session.highlighted().clone();

        // Already showing: no second charge.
        assert!(!session.request_hint());
        assert_eq!(session.hints(), INITIAL_HINTS - 1);
        assert_eq!(session.highlighted(), &shown);

        // The next accepted swap clears the highlight.
        session.swap(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
        assert!(session.highlighted().is_empty());
    }

    #[test]
    fn test_hint_refused_while_forming_pair() {
        let hand = Hand::from_tiles(&tiles("1m 1m 1m 2m 2m 2m 3m 3m 3m 4m 4m 4m")).unwrap();
        let mut session = Session::with_board(dead_board(), hand, GamePhase::FormingPair, 1);
        assert!(!session.request_hint());
        assert_eq!(session.hints(), INITIAL_HINTS);
    }

    #[test]
    fn test_collect_meld_switches_phase_at_cap() {
        let hand = Hand::from_tiles(&tiles("1m 1m 1m 2m 2m 2m 3m 3m 3m")).unwrap();
        let mut session = Session::with_board(dead_board(), hand, GamePhase::CollectingMelds, 1);
        let group = MatchGroup {
            cells: [Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)],
            kind: crate::matcher::MeldKind::Triplet,
        };
        assert!(session.collect_meld(group, [t("9s"); 3]));
        assert_eq!(session.hand().len(), 12);
        assert_eq!(session.phase(), GamePhase::FormingPair);
        assert_eq!(session.board().empty_count(), 3);

        // Further removals while forming the pair leave the hand alone.
        let group = MatchGroup {
            cells: [Pos::new(5, 0), Pos::new(5, 1), Pos::new(5, 2)],
            kind: crate::matcher::MeldKind::Triplet,
        };
        assert!(!session.collect_meld(group, [t("7z"); 3]));
        assert_eq!(session.hand().len(), 12);
        assert_eq!(session.board().empty_count(), 6);
    }

    #[test]
    fn test_win_with_short_hand_is_aborted() {
        let mut board = dead_board();
        board.set(Pos::new(0, 0), Some(t("5p")));
        board.set(Pos::new(0, 1), Some(t("5p")));
        // A 9-tile hand while forming the pair is inconsistent.
        let hand = Hand::from_tiles(&tiles("1m 1m 1m 2m 2m 2m 3m 3m 3m")).unwrap();
        let mut session = Session::with_board(board.clone(), hand.clone(), GamePhase::FormingPair, 1);

        let report = session.swap(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
        assert_eq!(report.outcome, SwapOutcome::WinAborted);
        assert_eq!(report.win, None);
        assert_eq!(session.board(), &board);
        assert_eq!(session.hand(), &hand);
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), GamePhase::FormingPair);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut session = Session::new(77, 1_000);
        session.swap(Pos::new(3, 3), Pos::new(3, 4)).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.board.len(), CELL_COUNT);

        let restored = Session::from_snapshot(&snap, 5).unwrap();
        assert_eq!(restored.board(), session.board());
        assert_eq!(restored.hand(), session.hand());
        assert_eq!(restored.phase(), session.phase());
        assert_eq!(restored.score(), session.score());
        assert_eq!(restored.wallet(), session.wallet());
        assert_eq!(restored.snapshot(), snap);
    }

    #[test]
    fn test_from_snapshot_rejects_invalid() {
        let mut snap = Session::new(1, 0).snapshot();
        snap.board.truncate(10);
        assert_eq!(
            Session::from_snapshot(&snap, 1).err(),
            Some(SnapshotError::BoardSize(10))
        );
    }

    #[test]
    fn test_reset_starts_over_but_keeps_hints() {
        let mut session = Session::new(9, 0);
        let board = session.board().clone();
        assert!(session.request_hint());
        assert!(session.reset(3_600));
        assert_ne!(session.board(), &board);
        assert_eq!(session.score(), 0);
        assert!(session.hand().is_empty());
        assert!(session.highlighted().is_empty());
        assert_eq!(session.hints(), INITIAL_HINTS - 1);
        assert_eq!(session.wallet().last_recovery_secs(), 0);
    }

    #[test]
    fn test_reset_cannot_refill_an_empty_wallet() {
        let mut snap = Session::new(9, 0).snapshot();
        snap.hints = 0;
        let mut session = Session::from_snapshot(&snap, 9).unwrap();
        assert!(session.reset(60));
        assert_eq!(session.hints(), 0);

        // A reset after a full recovery interval still grants the time-based hint.
        assert!(session.reset(HINT_RECOVERY_SECS + 60));
        assert_eq!(session.hints(), 1);
    }

    #[test]
    fn test_frame_mirrors_session() {
        let mut session = Session::new(4, 0);
        session.request_hint();
        let frame = session.frame(Some(Pos::new(2, 2)));
        assert_eq!(frame.board, session.board());
        assert_eq!(frame.hints, INITIAL_HINTS - 1);
        assert_eq!(frame.selected, Some(Pos::new(2, 2)));
        assert!(!frame.highlighted.is_empty());
        assert!(frame.is_highlighted(*frame.highlighted.iter().next().unwrap()));
    }
}
