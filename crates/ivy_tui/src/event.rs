//! Event source for the TUI.
//!
//! Polls crossterm for key presses and resizes. A timeout produces a tick,
//! which the main loop uses to pump session output.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Events produced by the event source for the TUI main loop.
#[derive(Clone, Debug)]
pub enum TuiEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// Nothing arrived before the timeout, or an ignored event arrived.
    Tick,
    /// The terminal was resized.
    Resize(u16, u16),
}

/// Polls for the next TUI event, waiting at most `timeout`.
///
/// Key releases and repeats are reported as [`TuiEvent::Tick`] so each
/// physical press triggers its action once.
pub fn poll_event(timeout: Duration) -> std::io::Result<TuiEvent> {
    if !event::poll(timeout)? {
        return Ok(TuiEvent::Tick);
    }
    Ok(translate(event::read()?))
}

fn translate(evt: CrosstermEvent) -> TuiEvent {
    match evt {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => TuiEvent::Key(key),
        CrosstermEvent::Resize(w, h) => TuiEvent::Resize(w, h),
        _ => TuiEvent::Tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn press_is_forwarded() {
        assert!(matches!(translate(key(KeyEventKind::Press)), TuiEvent::Key(_)));
    }

    #[test]
    fn release_and_repeat_are_ignored() {
        assert!(matches!(translate(key(KeyEventKind::Release)), TuiEvent::Tick));
        assert!(matches!(translate(key(KeyEventKind::Repeat)), TuiEvent::Tick));
    }

    #[test]
    fn resize_is_forwarded() {
        assert!(matches!(
            translate(CrosstermEvent::Resize(80, 24)),
            TuiEvent::Resize(80, 24)
        ));
    }

    #[test]
    fn focus_events_become_ticks() {
        assert!(matches!(translate(CrosstermEvent::FocusGained), TuiEvent::Tick));
    }
}
