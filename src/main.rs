//! Terminal Mahjong Match runner (default binary).
//!
//! Uses crossterm for keyboard/mouse input and the framebuffer renderer from
//! `mahjong_match::term`. The session is restored from the snapshot store on
//! start, and saved after every settled swap, hint, reset and hint recovery.
//! Logs go to a rotating file because the terminal is in raw mode.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use flexi_logger::{opt_format, Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use log::{error, info, warn};

use mahjong_match::config::AppConfig;
use mahjong_match::core::{
    Clock, ClickResult, Selection, Session, Stage, SwapOutcome, SwapReport, SystemClock,
};
use mahjong_match::input::{handle_key_event, handle_mouse_event};
use mahjong_match::store::{JsonFileStore, MemoryStore, SnapshotStore};
use mahjong_match::term::{FrameBuffer, GameView, Hud, TerminalRenderer, Viewport};
use mahjong_match::types::{InputEvent, Pos, HAND_MELD_CAP};

/// How often the loop wakes up without input to check hint recovery
const IDLE_POLL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    let _logger = start_logging(&config)?;

    let mut store: Box<dyn SnapshotStore> = if config.persist {
        Box::new(JsonFileStore::new(&config.save_path))
    } else {
        Box::new(MemoryStore::new())
    };

    let clock = SystemClock;
    let seed = config.seed.unwrap_or_else(clock_seed);
    let mut session = restore_or_start(store.as_ref(), seed, clock.now_secs());
    session.recover_hints(clock.now_secs());
    checkpoint(store.as_mut(), &session);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session, store.as_mut(), &clock);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        error!("terminal loop failed: {:#}", e);
    }
    result
}

fn start_logging(config: &AppConfig) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(&config.log_spec)
        .context("invalid log specification")?
        .log_to_file(
            FileSpec::default()
                .directory(&config.log_dir)
                .basename("mahjong-match"),
        )
        .format(opt_format)
        .rotate(
            Criterion::Size(5 * 1024 * 1024),
            Naming::Numbers,
            Cleanup::KeepLogFiles(3),
        )
        .start()
        .context("starting file logger")
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn restore_or_start(store: &dyn SnapshotStore, seed: u32, now_secs: u64) -> Session {
    match store.load().map(|snap| Session::from_snapshot(&snap, seed)) {
        Some(Ok(session)) => {
            info!(
                "resumed session: score {}, {} hints, hand {}",
                session.score(),
                session.hints(),
                session.hand().len()
            );
            session
        }
        Some(Err(e)) => {
            warn!("snapshot rejected ({}), starting fresh", e);
            Session::new(seed, now_secs)
        }
        None => {
            info!("starting fresh session (seed {})", seed);
            Session::new(seed, now_secs)
        }
    }
}

/// Persist the session; failures are logged, never fatal
fn checkpoint(store: &mut dyn SnapshotStore, session: &Session) {
    if let Err(e) = store.save(&session.snapshot()) {
        error!("saving session failed: {}", e);
    }
}

struct Screen {
    view: GameView,
    fb: FrameBuffer,
    selection: Selection,
    cursor: Pos,
    status: String,
}

impl Screen {
    fn viewport() -> Viewport {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        Viewport::new(w, h)
    }

    fn draw(&mut self, term: &mut TerminalRenderer, session: &Session) -> Result<()> {
        let frame = session.frame(self.selection.selected());
        let hud = Hud {
            cursor: Some(self.cursor),
            status: &self.status,
        };
        self.view
            .render_into(&frame, &hud, Self::viewport(), &mut self.fb);
        term.draw_swap(&mut self.fb)
    }
}

fn run(
    term: &mut TerminalRenderer,
    session: &mut Session,
    store: &mut dyn SnapshotStore,
    clock: &impl Clock,
) -> Result<()> {
    let mut screen = Screen {
        view: GameView::default(),
        fb: FrameBuffer::new(0, 0),
        selection: Selection::new(),
        cursor: Pos::new(0, 0),
        status: "Swap neighbouring tiles to form triplets and sequences".to_string(),
    };

    loop {
        screen.draw(term, session)?;

        if !event::poll(IDLE_POLL)? {
            let granted = session.recover_hints(clock.now_secs());
            if granted > 0 {
                checkpoint(store, session);
                screen.status = format!("{} hint(s) recovered", granted);
            }
            continue;
        }

        let input = match event::read()? {
            Event::Key(key) => handle_key_event(key),
            Event::Mouse(mouse) => {
                let viewport = Screen::viewport();
                let view = &screen.view;
                handle_mouse_event(mouse, |x, y| view.cell_at(viewport, x, y))
            }
            Event::Resize(_, _) => {
                term.invalidate();
                None
            }
            _ => None,
        };
        let Some(input) = input else {
            continue;
        };

        match input {
            InputEvent::Quit => return Ok(()),
            InputEvent::MoveCursor(dir) => {
                screen.cursor = screen.cursor.step(dir).unwrap_or(screen.cursor);
            }
            InputEvent::ClickCursor => {
                let pos = screen.cursor;
                click(term, session, store, &mut screen, pos)?;
            }
            InputEvent::Click(pos) => {
                screen.cursor = pos;
                click(term, session, store, &mut screen, pos)?;
            }
            InputEvent::Hint => {
                screen.status = if session.request_hint() {
                    checkpoint(store, session);
                    format!(
                        "{} cells can be swapped into a meld ({} hints left)",
                        session.highlighted().len(),
                        session.hints()
                    )
                } else if session.hints() == 0 {
                    "No hints left".to_string()
                } else {
                    "No hint available right now".to_string()
                };
            }
            InputEvent::Reset => {
                if session.reset(clock.now_secs()) {
                    screen.selection.clear();
                    checkpoint(store, session);
                    screen.status = "New game".to_string();
                }
            }
        }
    }
}

fn click(
    term: &mut TerminalRenderer,
    session: &mut Session,
    store: &mut dyn SnapshotStore,
    screen: &mut Screen,
    pos: Pos,
) -> Result<()> {
    let ClickResult::Swap(a, b) = screen.selection.click(pos) else {
        return Ok(());
    };
    let Some(mut resolution) = session.begin_swap(a, b) else {
        return Ok(());
    };

    while let Some(stage) = resolution.advance(session) {
        if let Stage::Reshuffled = stage {
            screen.status = "No moves left - reshuffling".to_string();
        }
        screen.draw(term, session)?;
        let pause = stage.pause_ms();
        if pause > 0 {
            thread::sleep(Duration::from_millis(pause as u64));
        }
    }

    // Input is only accepted again once the board has settled.
    while event::poll(Duration::ZERO)? {
        let _ = event::read()?;
    }

    checkpoint(store, session);
    screen.status = describe(resolution.report(), session);
    Ok(())
}

fn describe(report: &SwapReport, session: &Session) -> String {
    match report.outcome {
        SwapOutcome::Reverted => "No meld there - tiles swapped back".to_string(),
        SwapOutcome::Matched => {
            let mut s = format!("Meld! Hand {}/{}", session.hand().len(), HAND_MELD_CAP);
            if report.chains > 0 {
                s.push_str(&format!(" ({} chained)", report.chains));
            }
            if session.hand().len() >= HAND_MELD_CAP {
                s.push_str(" - now swap two identical tiles together");
            }
            s
        }
        SwapOutcome::Won => match &report.win {
            Some(win) => {
                let names: Vec<&str> = win.bonuses.iter().map(|b| b.name()).collect();
                if names.is_empty() {
                    format!("Hand complete! +{}", win.total)
                } else {
                    format!("Hand complete! +{} ({})", win.total, names.join(", "))
                }
            }
            None => "Hand complete!".to_string(),
        },
        SwapOutcome::WinAborted => "Hand out of step - win aborted".to_string(),
    }
}
