//! GameView: maps a core [`Frame`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout: the 20x20 board inside a border, each cell two columns wide so a
//! tile's short name ("5m", "Wh") fits exactly. The side panel to the right
//! shows score, hints, phase and hand. The line under the board carries a
//! status message.

use crate::core::Frame;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GamePhase, Pos, Suit, Tile, GRID_SIZE, HAND_MELD_CAP, HAND_WIN_SIZE};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const HIGHLIGHT_BG: Rgb = Rgb::new(40, 80, 110);
const SELECTED_BG: Rgb = Rgb::new(150, 130, 30);
const CURSOR_BG: Rgb = Rgb::new(75, 75, 95);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Frontend-only state drawn on top of the game frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hud<'a> {
    /// Keyboard cursor
    pub cursor: Option<Pos>,
    /// One-line message under the board
    pub status: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the tile board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    fn frame_size(&self) -> (u16, u16) {
        (GRID_SIZE as u16 * self.cell_w + 2, GRID_SIZE as u16 + 2)
    }

    /// Top-left corner of the board border
    fn origin(&self, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size();
        let panel_w = 34;
        let start_x = viewport.width.saturating_sub(frame_w + panel_w) / 2;
        // One extra row for the status line.
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h + 1) / 2,
            AnchorY::Top => 0,
        };
        (start_x, start_y)
    }

    /// Board cell under terminal position (`x` column, `y` row), if any.
    pub fn cell_at(&self, viewport: Viewport, x: u16, y: u16) -> Option<Pos> {
        let (start_x, start_y) = self.origin(viewport);
        let bx = x.checked_sub(start_x + 1)? / self.cell_w;
        let by = y.checked_sub(start_y + 1)?;
        if bx as usize >= GRID_SIZE || by as usize >= GRID_SIZE {
            return None;
        }
        Some(Pos::new(by as u8, bx as u8))
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, frame: &Frame<'_>, hud: &Hud<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).into_cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let (start_x, start_y) = self.origin(viewport);

        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for row in 0..GRID_SIZE as u8 {
            for col in 0..GRID_SIZE as u8 {
                let pos = Pos::new(row, col);
                let bg = if frame.is_selected(pos) {
                    SELECTED_BG
                } else if hud.cursor == Some(pos) {
                    CURSOR_BG
                } else if frame.is_highlighted(pos) {
                    HIGHLIGHT_BG
                } else {
                    BOARD_BG
                };
                let px = start_x + 1 + col as u16 * self.cell_w;
                let py = start_y + 1 + row as u16;
                match frame.board.tile(pos) {
                    Some(tile) => {
                        fb.put_str(px, py, tile_label(tile), tile_style(tile).on(bg));
                    }
                    // Only visible mid-cascade.
                    None => {
                        let hole = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
                        fb.fill_rect(px, py, self.cell_w, 1, '·', hole);
                    }
                }
            }
        }

        self.draw_side_panel(fb, frame, viewport, start_x + frame_w + 2, start_y);

        let status = CellStyle::new(Rgb::new(230, 230, 160), PANEL_BG);
        fb.put_str(start_x, start_y + frame_h, hud.status, status);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, frame: &Frame<'_>, hud: &Hud<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(frame, hud, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, frame: &Frame<'_>, viewport: Viewport, panel_x: u16, start_y: u16) {
        if panel_x >= viewport.width || viewport.width - panel_x < 16 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = value.dim();

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        fb.put_u64(panel_x, y, frame.score, value);
        y += 2;

        fb.put_str(panel_x, y, "HINTS", label);
        y += 1;
        let x = fb.put_u64(panel_x, y, frame.hints as u64, value);
        if !frame.highlighted.is_empty() {
            fb.put_str(x + 1, y, "(showing)", dim);
        }
        y += 2;

        fb.put_str(panel_x, y, "HAND", label);
        y += 1;
        match frame.phase {
            GamePhase::CollectingMelds => {
                let x = fb.put_u64(panel_x, y, frame.hand.len() as u64, value);
                let x = fb.put_str(x, y, "/", value);
                let x = fb.put_u64(x, y, HAND_MELD_CAP as u64, value);
                fb.put_str(x + 1, y, "collecting melds", dim);
            }
            GamePhase::FormingPair => {
                fb.put_str(panel_x, y, "READY - form a pair", label);
            }
        }
        y += 1;
        // Seven tiles per line, three columns each.
        for line in 0..HAND_WIN_SIZE / 7 {
            for slot in 0..7 {
                let i = line * 7 + slot;
                let sx = panel_x + slot as u16 * 3;
                match frame.hand.get(i) {
                    Some(&tile) => fb.put_str(sx, y, tile_label(tile), tile_style(tile).on(BOARD_BG)),
                    None => fb.put_str(sx, y, "..", dim.on(BOARD_BG)),
                };
            }
            y += 1;
        }
        y += 1;

        for help in [
            "arrows/hjkl  move",
            "space/enter  select",
            "mouse        select",
            "? / i        hint",
            "n            new game",
            "q            quit",
        ] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, help, dim);
            y += 1;
        }
    }
}

/// Two-column label: "5m" style for numbered suits, names for honors
pub fn tile_label(tile: Tile) -> &'static str {
    const NUMBERED: [[&str; 9]; 3] = [
        ["1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m"],
        ["1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p"],
        ["1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s"],
    ];
    const HONORS: [&str; 7] = ["Ea", "So", "We", "No", "Wh", "Gr", "Rd"];
    let rank = tile.rank() as usize - 1;
    match tile.suit() {
        Suit::Honor => HONORS[rank],
        suit => NUMBERED[suit.index()][rank],
    }
}

fn tile_style(tile: Tile) -> CellStyle {
    CellStyle::new(tile_color(tile), BOARD_BG).bold()
}

fn tile_color(tile: Tile) -> Rgb {
    match (tile.suit(), tile.rank()) {
        (Suit::Characters, _) => Rgb::new(235, 90, 80),
        (Suit::Circles, _) => Rgb::new(90, 150, 240),
        (Suit::Bamboo, _) => Rgb::new(100, 210, 110),
        (Suit::Honor, 5) => Rgb::new(245, 245, 245),
        (Suit::Honor, 6) => Rgb::new(60, 200, 90),
        (Suit::Honor, 7) => Rgb::new(230, 50, 50),
        (Suit::Honor, _) => Rgb::new(230, 200, 120),
    }
}
