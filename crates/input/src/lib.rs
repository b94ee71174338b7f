//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key and mouse events into [`crate::types::InputEvent`].
//! Mouse clicks need the screen layout to resolve a cell, so the caller
//! passes the view's hit test in.

pub mod map;

pub use mahjong_match_types as types;

pub use map::{handle_key_event, handle_mouse_event, should_quit};
