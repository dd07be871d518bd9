//! Terminal setup and teardown for the TUI.
//!
//! Provides helpers to enter and leave raw mode and the alternate screen,
//! to hand the terminal to an external editor and take it back, and to
//! restore the terminal before a panic message is printed.

use std::io::{self, Stdout};

use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

/// A ratatui terminal backed by crossterm on stdout.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enables raw mode, switches to the alternate screen, and returns a
/// terminal ready for rendering. Pair with [`restore_terminal`].
pub fn init_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

/// Leaves the alternate screen and disables raw mode.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Re-enters TUI mode after [`restore_terminal`] and forces a full redraw.
pub fn resume_terminal(terminal: &mut Tui) -> io::Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    terminal.clear()
}

/// Installs a panic hook that restores the terminal before printing.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
