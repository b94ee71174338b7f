//! Mahjong Match (workspace facade crate).
//!
//! A tile-matching game on a 20x20 board of mahjong tiles: swap neighbours to
//! line up triplets and sequences, collect four melds, then finish the hand
//! with a pair to score it.
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `mahjong_match::{types,core,store,input,term}` and adds
//! the runtime [`config`].

pub mod config;

pub use mahjong_match_core as core;
pub use mahjong_match_input as input;
pub use mahjong_match_store as store;
pub use mahjong_match_term as term;
pub use mahjong_match_types as types;
