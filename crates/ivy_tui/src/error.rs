//! Errors raised by the terminal front-end.

use ivy_session::SessionError;

/// Errors that end the interactive front-end.
///
/// Session command failures are shown in the status bar instead and never
/// surface here.
#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    /// Terminal setup, drawing, or event polling failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Closing the session failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}
