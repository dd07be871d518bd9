//! Implementation of the `ivy tui` command.

use ivy_session::{ExternalEditor, MemoryTranscript};

use crate::pipeline::{build_session, load_project};
use crate::GlobalArgs;

/// Opens the interactive front-end on the current project.
///
/// The file set is regenerated once up front; a failure is left in the
/// transcript for the user to see.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (root, config) = load_project(global)?;
    let mut session = build_session(&root, &config, MemoryTranscript::new())?;
    let _ = session.regenerate();

    let mut editor = ExternalEditor::from_env(config.tools.editor.as_deref());
    ivy_tui::run_tui(session, &mut editor)?;
    Ok(0)
}
