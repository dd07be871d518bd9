//! Editor collaborator used to open source files.

use std::io;
use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Opens a file for editing.
pub trait Editor {
    /// Opens `path` and returns once the editor has exited.
    fn open(&mut self, path: &Path) -> io::Result<()>;
}

/// Launches an external editor command line, e.g. `vim` or `code -w`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    /// Creates an editor from a whitespace-separated command line.
    ///
    /// An empty command line falls back to `vi`.
    pub fn new(command_line: &str) -> Self {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next().unwrap_or_else(|| "vi".to_string());
        Self {
            program,
            args: words.collect(),
        }
    }

    /// Picks the configured editor, then `$VISUAL`, then `$EDITOR`, then `vi`.
    pub fn from_env(configured: Option<&str>) -> Self {
        let chosen = configured
            .map(str::to_string)
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "vi".to_string());
        Self::new(&chosen)
    }

    /// Returns the editor program.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Editor for ExternalEditor {
    fn open(&mut self, path: &Path) -> io::Result<()> {
        debug!(editor = %self.program, path = %path.display(), "opening editor");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "editor `{}` exited with {status}",
                self.program
            )))
        }
    }
}
