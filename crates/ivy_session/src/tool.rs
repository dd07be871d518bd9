//! External tool identities and installation checks.

use std::fmt;
use std::path::PathBuf;

use ivy_config::ToolsConfig;

/// One of the external programs a session invokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    /// The Verilog compiler (`iverilog`).
    Compiler,
    /// The simulation runtime (`vvp`).
    Runtime,
    /// The waveform viewer (`gtkwave`).
    Viewer,
}

impl Tool {
    /// Returns the product name shown in transcript messages.
    pub fn product(self) -> &'static str {
        match self {
            Tool::Compiler | Tool::Runtime => "Icarus Verilog",
            Tool::Viewer => "GTKWave",
        }
    }

    /// Returns where the product can be downloaded.
    pub fn homepage(self) -> &'static str {
        match self {
            Tool::Compiler | Tool::Runtime => "http://iverilog.icarus.com",
            Tool::Viewer => "http://gtkwave.sourceforge.net",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tool::Compiler => "compiler",
            Tool::Runtime => "simulation runtime",
            Tool::Viewer => "waveform viewer",
        })
    }
}

/// The programs configured for each [`Tool`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolSet {
    /// Compiler program name or path.
    pub compiler: String,
    /// Runtime program name or path.
    pub runtime: String,
    /// Viewer program name or path.
    pub viewer: String,
}

impl ToolSet {
    /// Returns the program configured for `tool`.
    pub fn program(&self, tool: Tool) -> &str {
        match tool {
            Tool::Compiler => &self.compiler,
            Tool::Runtime => &self.runtime,
            Tool::Viewer => &self.viewer,
        }
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::from(&ToolsConfig::default())
    }
}

impl From<&ToolsConfig> for ToolSet {
    fn from(config: &ToolsConfig) -> Self {
        Self {
            compiler: config.compiler.clone(),
            runtime: config.runtime.clone(),
            viewer: config.viewer.clone(),
        }
    }
}

/// Resolves a program to an executable file.
///
/// A program containing a path separator must name an executable file
/// directly; a bare name is searched for on `PATH`.
pub fn locate(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
