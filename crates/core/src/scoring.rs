//! Scoring module - values a completed 14-tile hand
//!
//! A hand is decomposed into one pair plus four melds, then bonuses are added
//! on top of the base 1000 points:
//!
//! | Bonus | Points | Condition |
//! |-------|--------|-----------|
//! | Pure terminal sets | 2000 | every meld and the pair holds a terminal, no honors |
//! | Mixed terminal sets | 1000 | every meld and the pair holds a terminal or honor |
//! | Pure single suit | 4000 | one numbered suit, no honors (not with terminal sets) |
//! | Mixed single suit | 2000 | one numbered suit plus honors (not with terminal sets) |
//! | All triplets | 2000 | four triplets |
//! | Triple triplet | 2000 | same-rank triplets in all three numbered suits |
//! | Dragon triplet | 500 each | triplet of white, green or red dragons |
//! | Triple sequence | 2000 | same-start sequences in all three numbered suits |
//! | Full straight | 1000 | 1-2-3, 4-5-6, 7-8-9 of one suit |
//! | Duplicate sequence | 500 | two identical sequences (once) |
//!
//! Sequence bonuses are only considered when neither all-triplets nor a
//! terminal-sets bonus applied.
//!
//! Decomposition stops at the first pair candidate (ascending tile order) that
//! leaves four melds; alternative readings that might score higher are not
//! explored. A hand with no reading scores the base only.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::matcher::MeldKind;
use crate::types::{Suit, Tile, BASE_WIN_SCORE, HAND_WIN_SIZE, NUMBERED_SUITS};

/// A meld inside a decomposed hand, identified by its lowest tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Meld {
    pub kind: MeldKind,
    pub first: Tile,
}

impl Meld {
    pub fn tiles(&self) -> [Tile; 3] {
        match self.kind {
            MeldKind::Triplet => [self.first; 3],
            // Sequences are only ever built from a valid start rank (1..=7).
            MeldKind::Sequence => [
                self.first,
                self.first.successor(1).unwrap_or(self.first),
                self.first.successor(2).unwrap_or(self.first),
            ],
        }
    }

    pub fn is_triplet(&self) -> bool {
        self.kind == MeldKind::Triplet
    }

    pub fn is_sequence(&self) -> bool {
        self.kind == MeldKind::Sequence
    }
}

/// One pair plus four melds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    pub pair: Tile,
    pub melds: ArrayVec<Meld, 4>,
}

/// A scoring bonus that applied to a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bonus {
    PureTerminalSets,
    MixedTerminalSets,
    PureSingleSuit,
    MixedSingleSuit,
    AllTriplets,
    TripleTriplet,
    DragonTriplet(Tile),
    TripleSequence,
    FullStraight,
    DuplicateSequence,
}

impl Bonus {
    pub fn points(&self) -> u64 {
        match self {
            Bonus::PureTerminalSets => 2000,
            Bonus::MixedTerminalSets => 1000,
            Bonus::PureSingleSuit => 4000,
            Bonus::MixedSingleSuit => 2000,
            Bonus::AllTriplets => 2000,
            Bonus::TripleTriplet => 2000,
            Bonus::DragonTriplet(_) => 500,
            Bonus::TripleSequence => 2000,
            Bonus::FullStraight => 1000,
            Bonus::DuplicateSequence => 500,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Bonus::PureTerminalSets => "pure terminal sets",
            Bonus::MixedTerminalSets => "mixed terminal sets",
            Bonus::PureSingleSuit => "pure single suit",
            Bonus::MixedSingleSuit => "mixed single suit",
            Bonus::AllTriplets => "all triplets",
            Bonus::TripleTriplet => "triple triplet",
            Bonus::DragonTriplet(_) => "dragon triplet",
            Bonus::TripleSequence => "triple sequence",
            Bonus::FullStraight => "full straight",
            Bonus::DuplicateSequence => "duplicate sequence",
        }
    }
}

/// Score calculation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    /// Base plus every bonus
    pub total: u64,
    /// The reading that was scored, if the hand had one
    pub decomposition: Option<Decomposition>,
    pub bonuses: Vec<Bonus>,
}

impl ScoreResult {
    fn base_only() -> Self {
        Self {
            total: BASE_WIN_SCORE,
            decomposition: None,
            bonuses: Vec::new(),
        }
    }
}

type Counts = BTreeMap<Tile, u8>;

fn count_tiles(tiles: &[Tile]) -> Counts {
    let mut counts = Counts::new();
    for &tile in tiles {
        *counts.entry(tile).or_insert(0) += 1;
    }
    counts
}

fn take(counts: &mut Counts, tile: Tile, n: u8) -> bool {
    match counts.get_mut(&tile) {
        Some(c) if *c >= n => {
            *c -= n;
            true
        }
        _ => false,
    }
}

fn give(counts: &mut Counts, tile: Tile, n: u8) {
    *counts.entry(tile).or_insert(0) += n;
}

/// Consume the remaining tiles as melds, lowest tile first: triplet, then sequence.
fn find_melds(counts: &mut Counts, out: &mut ArrayVec<Meld, 4>) -> bool {
    let Some(lowest) = counts.iter().find(|(_, &n)| n > 0).map(|(&t, _)| t) else {
        return true;
    };
    if out.is_full() {
        return false;
    }

    if take(counts, lowest, 3) {
        out.push(Meld {
            kind: MeldKind::Triplet,
            first: lowest,
        });
        if find_melds(counts, out) {
            return true;
        }
        out.pop();
        give(counts, lowest, 3);
    }

    if let (Some(second), Some(third)) = (lowest.successor(1), lowest.successor(2)) {
        if counts.get(&second).copied().unwrap_or(0) > 0 && counts.get(&third).copied().unwrap_or(0) > 0 {
            take(counts, lowest, 1);
            take(counts, second, 1);
            take(counts, third, 1);
            out.push(Meld {
                kind: MeldKind::Sequence,
                first: lowest,
            });
            if find_melds(counts, out) {
                return true;
            }
            out.pop();
            give(counts, lowest, 1);
            give(counts, second, 1);
            give(counts, third, 1);
        }
    }

    false
}

/// Split 14 tiles into a pair and four melds
///
/// Pair candidates are tried in ascending tile order; the first one whose
/// remainder splits cleanly wins.
pub fn decompose(tiles: &[Tile]) -> Option<Decomposition> {
    if tiles.len() != HAND_WIN_SIZE {
        return None;
    }
    let mut counts = count_tiles(tiles);
    let candidates: Vec<Tile> = counts.iter().filter(|(_, &n)| n >= 2).map(|(&t, _)| t).collect();

    for pair in candidates {
        take(&mut counts, pair, 2);
        let mut melds = ArrayVec::new();
        if find_melds(&mut counts, &mut melds) && melds.is_full() {
            return Some(Decomposition { pair, melds });
        }
        give(&mut counts, pair, 2);
    }
    None
}

fn terminal_sets_bonus(d: &Decomposition, has_honor: bool) -> Option<Bonus> {
    let meld_ok = d
        .melds
        .iter()
        .all(|m| m.tiles().iter().any(|t| t.is_terminal_or_honor()));
    if !meld_ok || !d.pair.is_terminal_or_honor() {
        return None;
    }
    Some(if has_honor {
        Bonus::MixedTerminalSets
    } else {
        Bonus::PureTerminalSets
    })
}

fn suit_purity_bonus(tiles: &[Tile], has_honor: bool) -> Option<Bonus> {
    let suits = NUMBERED_SUITS
        .iter()
        .filter(|&&s| tiles.iter().any(|t| t.suit() == s))
        .count();
    if suits != 1 {
        return None;
    }
    Some(if has_honor {
        Bonus::MixedSingleSuit
    } else {
        Bonus::PureSingleSuit
    })
}

/// True if some rank (or start rank) appears in all three numbered suits
fn spans_all_suits(melds: &[&Meld]) -> bool {
    (1..=9u8).any(|rank| {
        NUMBERED_SUITS.iter().all(|&suit| {
            melds
                .iter()
                .any(|m| m.first.suit() == suit && m.first.rank() == rank)
        })
    })
}

fn full_straight(sequences: &[&Meld]) -> bool {
    NUMBERED_SUITS.iter().any(|&suit| {
        [1u8, 4, 7].iter().all(|&start| {
            sequences
                .iter()
                .any(|m| m.first.suit() == suit && m.first.rank() == start)
        })
    })
}

/// Score a completed hand
///
/// Anything other than 14 tiles, or 14 tiles with no pair-plus-four-melds
/// reading, scores the base 1000 with no bonuses.
pub fn evaluate_hand(tiles: &[Tile]) -> ScoreResult {
    let Some(decomposition) = decompose(tiles) else {
        return ScoreResult::base_only();
    };

    let has_honor = tiles.iter().any(|t| t.suit() == Suit::Honor);
    let mut bonuses = Vec::new();

    let terminal = terminal_sets_bonus(&decomposition, has_honor);
    if let Some(b) = terminal {
        bonuses.push(b);
    } else if let Some(b) = suit_purity_bonus(tiles, has_honor) {
        bonuses.push(b);
    }

    let triplets: Vec<&Meld> = decomposition.melds.iter().filter(|m| m.is_triplet()).collect();
    let sequences: Vec<&Meld> = decomposition.melds.iter().filter(|m| m.is_sequence()).collect();

    let all_triplets = triplets.len() == 4;
    if all_triplets {
        bonuses.push(Bonus::AllTriplets);
    }

    let numbered_triplets: Vec<&Meld> = triplets.iter().copied().filter(|m| !m.first.is_honor()).collect();
    if numbered_triplets.len() >= 3 && spans_all_suits(&numbered_triplets) {
        bonuses.push(Bonus::TripleTriplet);
    }

    for m in triplets.iter().filter(|m| m.first.is_dragon()) {
        bonuses.push(Bonus::DragonTriplet(m.first));
    }

    if !all_triplets && terminal.is_none() {
        if sequences.len() >= 3 && spans_all_suits(&sequences) {
            bonuses.push(Bonus::TripleSequence);
        }
        if full_straight(&sequences) {
            bonuses.push(Bonus::FullStraight);
        }
        let duplicated = sequences
            .iter()
            .enumerate()
            .any(|(i, a)| sequences[i + 1..].iter().any(|b| a.first == b.first));
        if duplicated {
            bonuses.push(Bonus::DuplicateSequence);
        }
    }

    let total = BASE_WIN_SCORE + bonuses.iter().map(Bonus::points).sum::<u64>();
    ScoreResult {
        total,
        decomposition: Some(decomposition),
        bonuses,
    }
}
