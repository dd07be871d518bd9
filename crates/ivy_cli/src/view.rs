//! Implementation of the `ivy view` command.
//!
//! Opens a previously exported waveform in the configured viewer without
//! re-running the simulation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use ivy_config::ToolsConfig;
use ivy_session::tool::locate;
use ivy_session::{Tool, ToolCommand};
use tracing::debug;

use crate::pipeline::{default_waveform_output, load_project};
use crate::{GlobalArgs, ViewArgs};

/// Runs the `ivy view` command.
///
/// With no file argument, opens the project's default export
/// `out/<top>.<ext>`. The viewer program comes from `ivy.toml` when a
/// project is found, otherwise the default `gtkwave` is used.
pub fn run(args: &ViewArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (path, tools) = match &args.file {
        Some(file) => {
            let tools = load_project(global)
                .map(|(_, config)| config.tools)
                .unwrap_or_default();
            (PathBuf::from(file), tools)
        }
        None => {
            let (root, config) = load_project(global)?;
            let path = default_waveform_output(&root, &config, &config.project.top);
            (path, config.tools)
        }
    };

    let command = viewer_command(&path, &tools)?;
    debug!(command = %command, "launching viewer");
    command
        .to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(0)
}

/// Checks the waveform and the viewer, then builds the viewer invocation.
fn viewer_command(
    path: &Path,
    tools: &ToolsConfig,
) -> Result<ToolCommand, Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!("file not found: {}", path.display()).into());
    }
    if locate(&tools.viewer).is_none() {
        return Err(format!(
            "{} does not appear to be installed correctly ({} not found); get it from {}",
            Tool::Viewer.product(),
            tools.viewer,
            Tool::Viewer.homepage()
        )
        .into());
    }
    Ok(ToolCommand::new(Tool::Viewer, tools.viewer.clone()).arg(path))
}
