//! TUI application core.
//!
//! [`TuiApp`] owns the session and the view state. Key presses become
//! session commands; [`TuiApp::tick`] pumps a running simulation.

use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use ivy_common::RunTime;
use ivy_session::{MemoryTranscript, PollOutcome, Session, SessionError};
use tracing::debug;

use crate::state::{FocusedPanel, TuiState};

/// The core TUI application state.
pub struct TuiApp {
    /// The session being driven.
    pub session: Session<MemoryTranscript>,
    /// View state (focus, selection, scrolling, messages).
    pub state: TuiState,
    /// Whether the application should quit.
    pub should_quit: bool,
    pending_edit: Option<PathBuf>,
}

impl TuiApp {
    /// Creates an application around `session`.
    pub fn new(session: Session<MemoryTranscript>) -> Self {
        Self {
            session,
            state: TuiState::new(),
            should_quit: false,
            pending_edit: None,
        }
    }

    /// Consumes the application, returning its session.
    pub fn into_session(self) -> Session<MemoryTranscript> {
        self.session
    }

    /// Returns the selected file, if the file set is non-empty.
    pub fn selected_file(&self) -> Option<&Path> {
        self.session
            .files()
            .get(self.state.selected_file)
            .map(PathBuf::as_path)
    }

    /// Takes the file the user asked to edit, if any.
    ///
    /// The main loop opens it with the terminal suspended.
    pub fn take_pending_edit(&mut self) -> Option<PathBuf> {
        self.pending_edit.take()
    }

    /// Records the result of an editor session in the status bar.
    pub fn report_edit(&mut self, path: &Path, result: io::Result<()>) {
        self.state.status_message = match result {
            Ok(()) => format!("edited {}", path.display()),
            Err(e) => format!("Error: {e}"),
        };
    }

    /// Pumps a running simulation. Called once per tick.
    pub fn tick(&mut self) {
        match self.session.poll() {
            Ok(PollOutcome::Finished { exit_code, .. }) => {
                self.state.status_message = format!("simulation finished (exit {exit_code})");
            }
            Ok(PollOutcome::Running { .. } | PollOutcome::Idle) => {}
            Err(e) => self.report(Err(e)),
        }
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        if self.state.show_help {
            if matches!(key, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.state.show_help = false;
            }
            return;
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.show_help = true,
            KeyCode::Char('g') => self.regenerate(),
            KeyCode::Char('c') => self.compile(),
            KeyCode::Char('r') => {
                let result = self.session.run();
                if result.is_ok() {
                    self.state.transcript_scroll = 0;
                    self.state.status_message = "simulation running".into();
                } else {
                    self.report(result);
                }
            }
            KeyCode::Char('w') => {
                let result = self.session.view_wave();
                self.report(result);
            }
            KeyCode::Char('x') => {
                if self.session.cancel() {
                    self.state.status_message = "simulation output abandoned".into();
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.step_time_value(1),
            KeyCode::Char('-') => self.step_time_value(-1),
            KeyCode::Char('u') => {
                let unit = self.session.run_time().unit().next();
                let result = self.session.set_time_unit(unit);
                self.report(result);
            }
            KeyCode::Char('U') => {
                let unit = self.session.run_time().unit().prev();
                let result = self.session.set_time_unit(unit);
                self.report(result);
            }
            KeyCode::Tab => self.state.focused = self.state.focused.toggle(),
            KeyCode::Char('j') | KeyCode::Down => match self.state.focused {
                FocusedPanel::Files => self.state.select_next_file(self.session.files().len()),
                FocusedPanel::Transcript => self.state.scroll_forward(),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.state.focused {
                FocusedPanel::Files => self.state.select_prev_file(),
                FocusedPanel::Transcript => {
                    let len = self.session.transcript().len();
                    self.state.scroll_back(len);
                }
            },
            KeyCode::Enter | KeyCode::Char('e') => {
                self.pending_edit = self.selected_file().map(Path::to_path_buf);
                if self.pending_edit.is_none() {
                    self.state.status_message = "no file selected".into();
                }
            }
            _ => {}
        }
    }

    fn regenerate(&mut self) {
        let result = self.session.regenerate().map(|files| files.len());
        match result {
            Ok(count) => {
                self.state.clamp_selection(count);
                self.state.status_message = format!("{count} file(s)");
            }
            Err(e) => self.report(Err(e)),
        }
    }

    fn compile(&mut self) {
        self.state.transcript_scroll = 0;
        match self.session.compile() {
            Ok(outcome) if outcome.succeeded() => {
                self.state.status_message = "compile successful".into();
            }
            Ok(outcome) => {
                self.state.status_message =
                    format!("compile failed (exit {})", outcome.exit_code);
            }
            Err(e) => self.report(Err(e)),
        }
    }

    /// Adds `delta` to the run time count, clamped to the valid range.
    fn step_time_value(&mut self, delta: i64) {
        let current = i64::from(self.session.run_time().value());
        let next = (current + delta).clamp(
            i64::from(RunTime::MIN_VALUE),
            i64::from(RunTime::MAX_VALUE),
        );
        if next == current {
            return;
        }
        // The clamp keeps `next` within u32.
        let result = self.session.set_time_value(next as u32);
        self.report(result);
    }

    /// Shows a command error in the status bar; success clears the message.
    fn report(&mut self, result: Result<(), SessionError>) {
        match result {
            Ok(()) => self.state.status_message.clear(),
            Err(e) => {
                debug!(error = %e, "command rejected");
                self.state.status_message = format!("Error: {e}");
            }
        }
    }
}
