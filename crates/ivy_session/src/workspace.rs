//! The per-session temporary directory.
//!
//! Holds the generated settings file, the compiled simulation object and the
//! waveform dump. The directory is created with the session and removed when
//! the [`SessionWorkspace`] is dropped or closed.

use std::io;
use std::path::{Path, PathBuf};

use ivy_config::WaveformFormat;
use tempfile::TempDir;

/// File name of the generated settings source.
pub const SETTINGS_FILE: &str = "settings.v";
/// File name of the compiled simulation object.
pub const OBJECT_FILE: &str = "object";

/// Owns the temporary directory backing one session.
#[derive(Debug)]
pub struct SessionWorkspace {
    dir: TempDir,
    waveform_file: String,
}

impl SessionWorkspace {
    /// Creates a fresh workspace in the system temporary directory.
    pub fn create(format: WaveformFormat) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("ivy-").tempdir()?;
        Ok(Self {
            dir,
            waveform_file: format!("wave.{}", format.extension()),
        })
    }


    /// Returns the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path of the generated settings source.
    pub fn settings_path(&self) -> PathBuf {
        self.dir.path().join(SETTINGS_FILE)
    }

    /// Returns the path of the compiled simulation object.
    pub fn object_path(&self) -> PathBuf {
        self.dir.path().join(OBJECT_FILE)
    }

    /// Returns the path of the waveform dump.
    pub fn waveform_path(&self) -> PathBuf {
        self.dir.path().join(&self.waveform_file)
    }

    /// Removes the workspace directory, reporting any failure.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}
