//! Simulation lifecycle state machine.
//!
//! Tracks whether a valid compiled object exists and whether it has been
//! run since the last compile, and decides which user actions are valid.

use std::fmt;

/// The lifecycle state of a simulation session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SimulationState {
    /// No valid compiled object.
    #[default]
    Start,
    /// A compiled object is ready but has not been run.
    Compiled,
    /// The compiled object has been run at least once since the last compile.
    Run,
}

/// A user action gated by the lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Recompute the file set from the dependency resolver.
    Regenerate,
    /// Compile the file set into a simulation object.
    Compile,
    /// Run the compiled simulation.
    Run,
    /// Open the waveform dump in the viewer.
    ViewWave,
}

impl Action {
    /// All actions, in menu order.
    pub const ALL: [Action; 4] = [
        Action::Regenerate,
        Action::Compile,
        Action::Run,
        Action::ViewWave,
    ];
}

impl SimulationState {
    /// Returns whether `action` is enabled in this state.
    ///
    /// | State    | Regenerate | Compile | Run | ViewWave |
    /// |----------|------------|---------|-----|----------|
    /// | Start    | yes        | yes     | no  | no       |
    /// | Compiled | yes        | yes     | yes | no       |
    /// | Run      | yes        | yes     | yes | yes      |
    pub fn is_enabled(self, action: Action) -> bool {
        match action {
            Action::Regenerate | Action::Compile => true,
            Action::Run => self != SimulationState::Start,
            Action::ViewWave => self == SimulationState::Run,
        }
    }

    /// The run time, top-level component or file set changed; any compiled
    /// object is stale.
    pub fn on_config_changed(self) -> Self {
        SimulationState::Start
    }

    /// The compiler exited with `exit_code`.
    pub fn on_compile_finished(self, exit_code: i32) -> Self {
        if exit_code == 0 {
            SimulationState::Compiled
        } else {
            SimulationState::Start
        }
    }

    /// The simulation output stream was exhausted and the runtime exited.
    ///
    /// Success and failure both land in `Run`.
    pub fn on_run_finished(self, _exit_code: i32) -> Self {
        SimulationState::Run
    }
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SimulationState::Start => "start",
            SimulationState::Compiled => "compiled",
            SimulationState::Run => "run",
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Regenerate => "regenerate",
            Action::Compile => "compile",
            Action::Run => "run",
            Action::ViewWave => "view wave",
        })
    }
}
