//! Integration tests for the swap / cascade / win flow

use mahjong_match::core::{
    find_all_matchable_cells, find_first_match, has_any_valid_move, valid_swaps, Board, Hand,
    Session, SimpleRng, SwapOutcome,
};
use mahjong_match::types::{GamePhase, Pos, Suit, Tile, GRID_SIZE, HAND_MELD_CAP, HAND_WIN_SIZE};

fn t(s: &str) -> Tile {
    s.parse().unwrap()
}

fn tiles(s: &str) -> Vec<Tile> {
    s.split_whitespace().map(t).collect()
}

/// Honors laid out as `(row + 2 * col) % 7`: no match and no productive swap
fn dead_board() -> Board {
    Board::from_fn(|p| Tile::new(Suit::Honor, ((p.row as usize + 2 * p.col as usize) % 7) as u8 + 1))
}

fn assert_phase_consistent(session: &Session) {
    let len = session.hand().len();
    match session.phase() {
        GamePhase::CollectingMelds => {
            assert!(len < HAND_MELD_CAP, "collecting with {} tiles", len);
            assert_eq!(len % 3, 0);
        }
        GamePhase::FormingPair => assert_eq!(len, HAND_MELD_CAP),
    }
}

#[test]
fn test_single_valid_swap_on_prepared_board() {
    let mut board = dead_board();
    board.set(Pos::new(0, 0), Some(t("1m")));
    board.set(Pos::new(0, 1), Some(t("2m")));
    board.set(Pos::new(0, 3), Some(t("3m")));
    assert_eq!(find_first_match(&board), None);
    assert_eq!(valid_swaps(&board), vec![(Pos::new(0, 2), Pos::new(0, 3))]);
    assert_eq!(
        find_all_matchable_cells(&board, GamePhase::CollectingMelds)
            .into_iter()
            .collect::<Vec<_>>(),
        vec![Pos::new(0, 2), Pos::new(0, 3)]
    );

    let mut session = Session::with_board(board, Hand::new(), GamePhase::CollectingMelds, 3);
    let report = session.swap(Pos::new(0, 2), Pos::new(0, 3)).unwrap();
    assert_eq!(report.outcome, SwapOutcome::Matched);
    assert_eq!(report.melds[0], [t("1m"), t("2m"), t("3m")]);
    assert_eq!(report.chains, 0);
    assert_eq!(session.hand().len(), 3);
    for tile in tiles("1m 2m 3m") {
        assert!(session.hand().tiles().contains(&tile));
    }
    assert!(session.board().is_full());
    assert_phase_consistent(&session);
}

#[test]
fn test_deadlocked_board_is_reshuffled_until_playable() {
    for seed in 1..=5 {
        // After the only meld is taken, the refilled board has no move left.
        let mut board = dead_board();
        board.set(Pos::new(0, 0), Some(t("1m")));
        board.set(Pos::new(0, 1), Some(t("2m")));
        board.set(Pos::new(0, 3), Some(t("3m")));
        let mut session = Session::with_board(board, Hand::new(), GamePhase::CollectingMelds, seed);

        let report = session.swap(Pos::new(0, 2), Pos::new(0, 3)).unwrap();
        assert_eq!(report.outcome, SwapOutcome::Matched);
        assert!(report.reshuffles >= 1, "seed {} never reshuffled", seed);
        assert!(session.board().is_full());
        assert_eq!(find_first_match(session.board()), None);
        assert!(has_any_valid_move(session.board(), GamePhase::CollectingMelds));
        assert_phase_consistent(&session);
    }
}

#[test]
fn test_non_matching_swap_is_undone() {
    let board = dead_board();
    let mut session = Session::with_board(board.clone(), Hand::new(), GamePhase::CollectingMelds, 3);
    let report = session.swap(Pos::new(4, 4), Pos::new(5, 4)).unwrap();
    assert_eq!(report.outcome, SwapOutcome::Reverted);
    assert_eq!(session.board(), &board);
    assert!(session.hand().is_empty());
}

#[test]
fn test_completing_the_hand_scores_and_starts_next_round() {
    let mut board = dead_board();
    board.set(Pos::new(10, 10), Some(t("8s")));
    board.set(Pos::new(10, 11), Some(t("8s")));
    let hand = Hand::from_tiles(&tiles("2m 2m 2m 5m 5m 5m 7m 7m 7m 3p 3p 3p")).unwrap();
    let mut session = Session::with_board(board, hand, GamePhase::FormingPair, 11);

    let report = session.swap(Pos::new(10, 10), Pos::new(10, 11)).unwrap();
    assert_eq!(report.outcome, SwapOutcome::Won);
    let win = report.win.expect("won swap carries its score");
    // Base 1000 plus the all-triplets bonus.
    assert_eq!(win.total, 3000);
    assert_eq!(session.score(), 3000);

    // The hand was emptied; anything in it now came from the refill cascade.
    assert_eq!(session.hand().len(), 3 * report.melds.len());
    assert_phase_consistent(&session);
    assert!(session.board().is_full());
}

#[test]
fn test_win_crossing_score_milestone_awards_hint() {
    let mut board = dead_board();
    board.set(Pos::new(10, 10), Some(t("8s")));
    board.set(Pos::new(10, 11), Some(t("8s")));
    let hand = Hand::from_tiles(&tiles("2m 2m 2m 5m 5m 5m 7m 7m 7m 3p 3p 3p")).unwrap();
    let mut snap = Session::with_board(board, hand, GamePhase::FormingPair, 11).snapshot();
    snap.score = 9_500;
    snap.hints = 0;
    let mut session = Session::from_snapshot(&snap, 11).unwrap();

    let report = session.swap(Pos::new(10, 10), Pos::new(10, 11)).unwrap();
    assert_eq!(report.outcome, SwapOutcome::Won);
    assert_eq!(session.score(), 12_500);
    assert_eq!(session.hints(), 1);
}

#[test]
fn test_forming_pair_ignores_non_identical_swap() {
    let mut board = dead_board();
    board.set(Pos::new(0, 0), Some(t("1m")));
    board.set(Pos::new(0, 1), Some(t("1m")));
    board.set(Pos::new(0, 2), Some(t("1m")));
    let hand = Hand::from_tiles(&tiles("2m 2m 2m 5m 5m 5m 7m 7m 7m 3p 3p 3p")).unwrap();
    let mut session = Session::with_board(board.clone(), hand, GamePhase::FormingPair, 11);

    // A triplet on the board is not a pair.
    let report = session.swap(Pos::new(0, 2), Pos::new(1, 2)).unwrap();
    assert_eq!(report.outcome, SwapOutcome::Reverted);
    assert_eq!(session.board(), &board);
    assert_eq!(session.hand().len(), HAND_MELD_CAP);
    assert_eq!(session.score(), 0);
}

#[test]
fn test_out_of_step_hand_aborts_win() {
    let mut board = dead_board();
    board.set(Pos::new(0, 0), Some(t("5p")));
    board.set(Pos::new(1, 0), Some(t("5p")));
    let hand = Hand::from_tiles(&tiles("1m 1m 1m 2m 2m 2m")).unwrap();
    let mut session = Session::with_board(board.clone(), hand, GamePhase::FormingPair, 2);

    let report = session.swap(Pos::new(0, 0), Pos::new(1, 0)).unwrap();
    assert_eq!(report.outcome, SwapOutcome::WinAborted);
    assert_eq!(session.board(), &board);
    assert_eq!(session.hand().len(), 6);
    assert_ne!(session.hand().len() + 2, HAND_WIN_SIZE);
}

#[test]
fn test_phase_invariant_holds_over_a_long_game() {
    let mut session = Session::new(2024, 0);
    let mut rng = SimpleRng::new(99);
    let n = GRID_SIZE as u32;

    for _ in 0..60 {
        let (a, b) = match session.phase() {
            GamePhase::CollectingMelds => match valid_swaps(session.board()).first() {
                Some(&pair) => pair,
                None => panic!("settled board without a valid move"),
            },
            GamePhase::FormingPair => {
                let a = Pos::new(rng.next_range(n) as u8, rng.next_range(n - 1) as u8);
                (a, Pos::new(a.row, a.col + 1))
            }
        };
        session.swap(a, b).unwrap();

        assert!(!session.is_busy());
        assert!(session.board().is_full());
        assert_phase_consistent(&session);
        if session.phase() == GamePhase::CollectingMelds {
            assert_eq!(find_first_match(session.board()), None);
        }
    }
}

#[test]
fn test_gravity_is_idempotent() {
    let mut board = dead_board();
    for pos in [Pos::new(19, 0), Pos::new(7, 0), Pos::new(3, 5), Pos::new(19, 19)] {
        board.take(pos);
    }
    assert!(board.apply_gravity() > 0);
    let once = board.clone();
    assert_eq!(board.apply_gravity(), 0);
    assert_eq!(board, once);
    assert_eq!(board.tile(Pos::new(0, 0)), None);
    assert_eq!(board.tile(Pos::new(1, 0)), None);
    assert!(board.tile(Pos::new(2, 0)).is_some());
}
