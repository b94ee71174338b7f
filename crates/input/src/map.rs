//! Mapping from terminal events to game input.

use crate::types::{Direction, InputEvent, Pos};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Map keyboard input to game input.
///
/// Only presses count; release and repeat events (where the terminal reports
/// them) are ignored so a held key does not fire twice.
pub fn handle_key_event(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(InputEvent::MoveCursor(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(InputEvent::MoveCursor(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(InputEvent::MoveCursor(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(InputEvent::MoveCursor(Direction::Down))
        }

        // Actions
        KeyCode::Char(' ') | KeyCode::Enter => Some(InputEvent::ClickCursor),
        KeyCode::Char('?') | KeyCode::Char('i') | KeyCode::Char('I') => Some(InputEvent::Hint),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(InputEvent::Reset),

        _ if should_quit(key) => Some(InputEvent::Quit),
        _ => None,
    }
}

/// Map a left click to a board click, using `hit_test` to turn terminal
/// coordinates (column, row) into a board cell.
pub fn handle_mouse_event(
    mouse: MouseEvent,
    hit_test: impl Fn(u16, u16) -> Option<Pos>,
) -> Option<InputEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => hit_test(mouse.column, mouse.row).map(InputEvent::Click),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
