//! Terminal event mapping, end to end with the view's hit test

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use mahjong_match::input::{handle_key_event, handle_mouse_event};
use mahjong_match::term::{AnchorY, GameView, Viewport};
use mahjong_match::types::{Direction, InputEvent, Pos};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn left_click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn test_keyboard_drives_cursor_and_actions() {
    assert_eq!(
        handle_key_event(press(KeyCode::Char('k'))),
        Some(InputEvent::MoveCursor(Direction::Up))
    );
    assert_eq!(
        handle_key_event(press(KeyCode::Right)),
        Some(InputEvent::MoveCursor(Direction::Right))
    );
    assert_eq!(handle_key_event(press(KeyCode::Enter)), Some(InputEvent::ClickCursor));
    assert_eq!(handle_key_event(press(KeyCode::Char('?'))), Some(InputEvent::Hint));
    assert_eq!(handle_key_event(press(KeyCode::Char('n'))), Some(InputEvent::Reset));
    assert_eq!(handle_key_event(press(KeyCode::Char('q'))), Some(InputEvent::Quit));
    assert_eq!(
        handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(InputEvent::Quit)
    );
    assert_eq!(handle_key_event(press(KeyCode::Char('x'))), None);
}

#[test]
fn test_key_release_is_ignored() {
    let release = KeyEvent {
        code: KeyCode::Char(' '),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    assert_eq!(handle_key_event(release), None);
}

#[test]
fn test_mouse_click_resolves_through_view() {
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let vp = Viewport::new(42, 23);
    let hit = |x, y| view.cell_at(vp, x, y);

    assert_eq!(
        handle_mouse_event(left_click(5, 3), hit),
        Some(InputEvent::Click(Pos::new(2, 2)))
    );
    // Border and status line are not cells.
    assert_eq!(handle_mouse_event(left_click(0, 3), hit), None);
    assert_eq!(handle_mouse_event(left_click(5, 22), hit), None);

    let right = MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Right),
        ..left_click(5, 3)
    };
    assert_eq!(handle_mouse_event(right, hit), None);
}
