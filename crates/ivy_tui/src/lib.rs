//! Terminal front-end for an Ivy simulation session.
//!
//! Wraps a [`Session`] in a ratatui interface: a toolbar with the run time
//! and the four session actions, the file set, the session transcript, and
//! a status bar. Session output is pumped by a periodic tick at the
//! session's poll interval, so the interface stays responsive while a
//! simulation runs.
//!
//! # Usage
//!
//! ```ignore
//! use ivy_tui::run_tui;
//!
//! let session = Session::new(config, resolver, MemoryTranscript::new())?;
//! run_tui(session, &mut ExternalEditor::from_env(None))?;
//! ```
//!
//! # Layout
//!
//! - **Toolbar** (top): run time and action keys, dimmed when disabled
//! - **Files** (left): the current file set
//! - **Transcript** (right): tool output, tailing unless scrolled back
//! - **Status Bar** (bottom): lifecycle state, busy flag, last message

#![warn(missing_docs)]

pub mod app;
pub mod error;
pub mod event;
pub mod render;
pub mod state;
pub mod terminal;
pub mod widgets;

use std::time::Instant;

use ivy_session::{Editor, MemoryTranscript, Session};

pub use app::TuiApp;
pub use error::TuiError;
use event::{poll_event, TuiEvent};
use terminal::{init_terminal, install_panic_hook, restore_terminal, resume_terminal, Tui};

/// Runs the interactive front-end until the user quits.
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// on exit (including on panic). The session is closed afterwards, which
/// abandons a still-running simulation and removes the workspace.
///
/// # Errors
///
/// Returns [`TuiError`] on terminal I/O failures.
pub fn run_tui(
    session: Session<MemoryTranscript>,
    editor: &mut dyn Editor,
) -> Result<(), TuiError> {
    install_panic_hook();
    let mut terminal = init_terminal()?;

    let mut app = TuiApp::new(session);
    let result = run_tui_loop(&mut app, &mut terminal, editor);

    restore_terminal()?;
    result?;
    app.into_session().close()?;
    Ok(())
}

fn run_tui_loop(
    app: &mut TuiApp,
    terminal: &mut Tui,
    editor: &mut dyn Editor,
) -> Result<(), TuiError> {
    let tick_rate = app.session.poll_interval();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render::render(app, frame))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        match poll_event(timeout)? {
            TuiEvent::Key(key) => app.handle_key(key.code),
            TuiEvent::Resize(_, _) | TuiEvent::Tick => {}
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if let Some(path) = app.take_pending_edit() {
            restore_terminal()?;
            let opened = editor.open(&path);
            resume_terminal(terminal)?;
            app.report_edit(&path, opened);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use ivy_session::{MemoryTranscript, Session, SessionConfig, StaticResolver, ToolSet};

    use crate::app::TuiApp;

    /// A session over two files whose tools are all missing.
    pub fn test_session() -> Session<MemoryTranscript> {
        let mut config = SessionConfig::new("counter_tb");
        config.tools = ToolSet {
            compiler: "/no/such/iverilog".into(),
            runtime: "/no/such/vvp".into(),
            viewer: "/no/such/gtkwave".into(),
        };
        config.files = vec![
            PathBuf::from("rtl/counter.v"),
            PathBuf::from("tests/counter_tb.v"),
        ];
        let resolver = StaticResolver::new(config.files.clone());
        Session::new(config, Box::new(resolver), MemoryTranscript::new()).unwrap()
    }

    pub fn test_app() -> TuiApp {
        TuiApp::new(test_session())
    }

    /// Returns row `y` of `buf` as a string, one char per cell.
    pub fn row(buf: &ratatui::buffer::Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.get(buf.area.x + x, y).symbol().to_string())
            .collect()
    }
}
