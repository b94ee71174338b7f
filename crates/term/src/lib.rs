//! Terminal "game renderer" module.
//!
//! A small rendering layer for the tile board: no widget or layout library,
//! just a framebuffer of styled cells flushed through crossterm.
//!
//! - [`fb`]: styled character cells
//! - [`game_view`]: core frame to framebuffer, and screen position to board cell
//! - [`renderer`]: full and diffed flushes through crossterm

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use mahjong_match_core as core;
pub use mahjong_match_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tile_label, AnchorY, GameView, Hud, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
