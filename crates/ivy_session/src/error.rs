//! Error types for session operations.

use std::path::PathBuf;

use ivy_common::ParseRunTimeError;

use crate::state::{Action, SimulationState};
use crate::tool::Tool;

/// Errors returned by [`Session`](crate::Session) commands.
///
/// None of these are fatal: the session stays usable after any of them.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The configured program for a tool is missing or not executable.
    /// Detected before anything is spawned.
    #[error("{tool} `{program}` does not appear to be installed")]
    ToolNotInstalled {
        /// The tool that was required.
        tool: Tool,
        /// The program that could not be found.
        program: String,
    },

    /// The action is not enabled in the current lifecycle state.
    #[error("cannot {action} in state '{state}'")]
    ActionDisabled {
        /// The rejected action.
        action: Action,
        /// The state at the time of the request.
        state: SimulationState,
    },

    /// A simulation is still running.
    #[error("a simulation is already running")]
    AlreadyRunning,

    /// The dependency resolver failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Writing the settings file, spawning a tool, or waiting on it failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested run time is invalid.
    #[error(transparent)]
    InvalidRunTime(#[from] ParseRunTimeError),
}

/// Errors produced while regenerating the file set.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No source files were found for the component.
    #[error("no source files found for component '{top}'")]
    NoSources {
        /// The top-level component that was resolved.
        top: String,
    },

    /// A configured source directory does not exist.
    #[error("source directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Scanning the source directories failed.
    #[error("failed to scan sources: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_tool_not_installed() {
        let err = SessionError::ToolNotInstalled {
            tool: Tool::Compiler,
            program: "iverilog".into(),
        };
        assert_eq!(
            err.to_string(),
            "compiler `iverilog` does not appear to be installed"
        );
    }

    #[test]
    fn display_action_disabled() {
        let err = SessionError::ActionDisabled {
            action: Action::Run,
            state: SimulationState::Start,
        };
        assert_eq!(err.to_string(), "cannot run in state 'start'");
    }

    #[test]
    fn resolve_error_is_transparent() {
        let err: SessionError = ResolveError::NoSources { top: "tb".into() }.into();
        assert_eq!(err.to_string(), "no source files found for component 'tb'");
    }

    #[test]
    fn display_missing_directory() {
        let err = ResolveError::MissingDirectory(PathBuf::from("rtl"));
        assert_eq!(err.to_string(), "source directory not found: rtl");
    }
}
