//! The session controller.
//!
//! [`Session`] owns the lifecycle state, the run configuration, the file set,
//! the workspace and at most one running simulation. Front-ends drive it
//! through explicit command methods and call [`Session::poll`] periodically.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use ivy_common::{RunTime, TimeUnit};
use ivy_config::{ProjectConfig, WaveformFormat};
use tracing::{debug, info, warn};

use crate::command::CommandBuilder;
use crate::error::SessionError;
use crate::pump::{self, OutputPump, PumpPoll};
use crate::resolver::DependencyResolver;
use crate::state::{Action, SimulationState};
use crate::tool::{self, Tool, ToolSet};
use crate::transcript::Transcript;
use crate::workspace::SessionWorkspace;

/// Settings a session is constructed with.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Name of the top-level component.
    pub top: String,
    /// Initial run time.
    pub run_time: RunTime,
    /// External tool programs.
    pub tools: ToolSet,
    /// Waveform dump format.
    pub waveform_format: WaveformFormat,
    /// Interval at which the host should call [`Session::poll`].
    pub poll_interval: Duration,
    /// Maximum lines forwarded per poll.
    pub batch_lines: usize,
    /// Initial file set, before the first regenerate.
    pub files: Vec<PathBuf>,
}

impl SessionConfig {
    /// Creates a configuration with default tools and pump settings.
    pub fn new(top: impl Into<String>) -> Self {
        Self {
            top: top.into(),
            run_time: RunTime::default(),
            tools: ToolSet::default(),
            waveform_format: WaveformFormat::default(),
            poll_interval: Duration::from_millis(100),
            batch_lines: 100,
            files: Vec::new(),
        }
    }

    /// Derives a session configuration from a loaded `ivy.toml`.
    pub fn from_project(config: &ProjectConfig) -> Result<Self, SessionError> {
        Ok(Self {
            top: config.project.top.clone(),
            run_time: config.run.run_time()?,
            tools: ToolSet::from(&config.tools),
            waveform_format: config.waveform.format,
            poll_interval: Duration::from_millis(config.pump.interval_ms),
            batch_lines: config.pump.batch_lines,
            files: Vec::new(),
        })
    }
}

/// Result of a completed compile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOutcome {
    /// Compiler exit code.
    pub exit_code: i32,
}

impl CompileOutcome {
    /// Returns `true` if the compiler exited with code 0.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Result of one [`Session::poll`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// No simulation is running.
    Idle,
    /// The simulation is still running; `forwarded` lines were transcribed.
    Running {
        /// Lines forwarded by this poll.
        forwarded: usize,
    },
    /// The output stream was exhausted and the simulation exited.
    Finished {
        /// Lines forwarded by this poll.
        forwarded: usize,
        /// Runtime exit code.
        exit_code: i32,
    },
}

/// Controller for one simulation session.
pub struct Session<T: Transcript> {
    top: String,
    run_time: RunTime,
    files: Vec<PathBuf>,
    state: SimulationState,
    poll_interval: Duration,
    batch_lines: usize,
    builder: CommandBuilder,
    resolver: Box<dyn DependencyResolver>,
    transcript: T,
    running: Option<OutputPump>,
    last_exit_code: Option<i32>,
    // Dropped last so the tools' files outlive everything that refers to them.
    workspace: SessionWorkspace,
}

impl<T: Transcript> Session<T> {
    /// Creates a session with a fresh temporary workspace.
    pub fn new(
        config: SessionConfig,
        resolver: Box<dyn DependencyResolver>,
        transcript: T,
    ) -> Result<Self, SessionError> {
        let workspace = SessionWorkspace::create(config.waveform_format)?;
        Ok(Self::with_workspace(config, workspace, resolver, transcript))
    }

    /// Creates a session using an existing workspace.
    pub fn with_workspace(
        config: SessionConfig,
        workspace: SessionWorkspace,
        resolver: Box<dyn DependencyResolver>,
        transcript: T,
    ) -> Self {
        let builder = CommandBuilder::new(config.tools, config.waveform_format, &workspace);
        debug!(workspace = %workspace.path().display(), top = %config.top, "session created");
        Self {
            top: config.top,
            run_time: config.run_time,
            files: config.files,
            state: SimulationState::Start,
            poll_interval: config.poll_interval,
            batch_lines: config.batch_lines.max(1),
            builder,
            resolver,
            transcript,
            running: None,
            last_exit_code: None,
            workspace,
        }
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Returns the top-level component name.
    pub fn top(&self) -> &str {
        &self.top
    }

    /// Returns the run time.
    pub fn run_time(&self) -> RunTime {
        self.run_time
    }

    /// Returns the current file set.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Returns the transcript.
    pub fn transcript(&self) -> &T {
        &self.transcript
    }

    /// Returns the transcript mutably.
    pub fn transcript_mut(&mut self) -> &mut T {
        &mut self.transcript
    }

    /// Returns the session workspace.
    pub fn workspace(&self) -> &SessionWorkspace {
        &self.workspace
    }

    /// Returns the interval at which the host should call [`poll`](Self::poll).
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns `true` while a simulation is running.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Returns the exit code of the most recent compile or simulation.
    pub fn last_exit_code(&self) -> Option<i32> {
        self.last_exit_code
    }

    /// Returns whether `action` may be invoked now.
    ///
    /// Follows the lifecycle table, except that regenerate, compile and run
    /// are unavailable while a simulation is running.
    pub fn is_enabled(&self, action: Action) -> bool {
        if self.is_running() && action != Action::ViewWave {
            return false;
        }
        self.state.is_enabled(action)
    }

    /// Sets the run time count, keeping the unit. Forces state `Start`.
    pub fn set_time_value(&mut self, value: u32) -> Result<(), SessionError> {
        let run_time = RunTime::new(value, self.run_time.unit())?;
        self.set_run_time(run_time);
        Ok(())
    }

    /// Sets the run time unit, keeping the count. Forces state `Start`.
    pub fn set_time_unit(&mut self, unit: TimeUnit) -> Result<(), SessionError> {
        let run_time = RunTime::new(self.run_time.value(), unit)?;
        self.set_run_time(run_time);
        Ok(())
    }

    /// Replaces the run time. Forces state `Start`.
    pub fn set_run_time(&mut self, run_time: RunTime) {
        self.run_time = run_time;
        self.transition(self.state.on_config_changed());
    }

    /// Changes the top-level component. Forces state `Start`.
    pub fn set_top(&mut self, top: impl Into<String>) {
        self.top = top.into();
        self.transition(self.state.on_config_changed());
    }

    /// Returns the settings source the next compile would write.
    pub fn settings_source(&self) -> String {
        self.builder.settings_source(&self.top, self.run_time.duration())
    }

    /// Recomputes the file set for the top-level component.
    ///
    /// The state is reset to `Start` first. On failure the previous file set
    /// is kept.
    pub fn regenerate(&mut self) -> Result<&[PathBuf], SessionError> {
        self.ensure_idle()?;
        self.transition(self.state.on_config_changed());
        self.transcript.append("Generating all dependencies");
        let files = match self.resolver.regenerate(&self.top) {
            Ok(files) => files,
            Err(e) => {
                self.transcript
                    .append(&format!("Dependency generation failed: {e}"));
                warn!(error = %e, top = %self.top, "regenerate failed");
                return Err(e.into());
            }
        };
        self.transcript.append("Creating file list");
        self.files = files;
        info!(count = self.files.len(), top = %self.top, "file set regenerated");
        Ok(&self.files)
    }

    /// Compiles the file set, blocking until the compiler exits.
    ///
    /// Output is forwarded to the transcript line by line as it arrives.
    /// A nonzero exit is reported in the outcome, not as an error.
    pub fn compile(&mut self) -> Result<CompileOutcome, SessionError> {
        self.ensure_idle()?;
        self.require_tool(Tool::Compiler)?;

        self.transcript.append("Launching Icarus Verilog compiler");
        std::fs::write(self.builder.settings_path(), self.settings_source())?;
        for path in &self.files {
            self.transcript.append(&format!("compiling: {}", path.display()));
        }

        let command = self.builder.compile(&self.files);
        self.transcript.append(&format!("$ {command}"));
        let mut pump = match OutputPump::spawn(&command) {
            Ok(pump) => pump,
            Err(e) => {
                self.transition(SimulationState::Start);
                self.transcript
                    .append(&format!("Icarus Verilog compile ... failed to start: {e}"));
                return Err(e.into());
            }
        };

        let transcript = &mut self.transcript;
        pump.drain(|line| transcript.append(&line));
        self.finish_compile(pump.wait())
    }

    /// Records the compiler's exit. A failed wait counts as a failed compile.
    fn finish_compile(&mut self, waited: io::Result<i32>) -> Result<CompileOutcome, SessionError> {
        let exit_code = *waited.as_ref().unwrap_or(&-1);
        self.last_exit_code = Some(exit_code);
        self.transition(self.state.on_compile_finished(exit_code));
        if exit_code == 0 {
            self.transcript.append("Icarus Verilog compile ... successful");
        } else {
            self.transcript.append("Icarus Verilog compile ... failed");
        }
        waited.inspect_err(|e| warn!(error = %e, "failed to wait for compiler"))?;
        Ok(CompileOutcome { exit_code })
    }

    /// Starts the compiled simulation and returns immediately.
    ///
    /// Output is delivered by subsequent [`poll`](Self::poll) calls.
    pub fn run(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.ensure_enabled(Action::Run)?;
        self.require_tool(Tool::Runtime)?;

        self.transcript.append("Launching Icarus Verilog simulation");
        let command = self.builder.run();
        self.transcript.append(&format!("$ {command}"));
        let pump = OutputPump::spawn(&command).inspect_err(|e| {
            self.transcript
                .append(&format!("Icarus Verilog simulation ... failed to start: {e}"));
        })?;
        info!(pid = pump.id(), "simulation started");
        self.running = Some(pump);
        Ok(())
    }

    /// Drains a bounded batch of simulation output.
    ///
    /// When the output stream is exhausted the process is waited on, its
    /// exit code recorded, and the state moves to `Run`.
    pub fn poll(&mut self) -> Result<PollOutcome, SessionError> {
        let Some(pump) = self.running.as_mut() else {
            return Ok(PollOutcome::Idle);
        };

        let transcript = &mut self.transcript;
        let mut forwarded = 0;
        let status = pump.poll(self.batch_lines, |line| {
            transcript.append(&line);
            forwarded += 1;
        });
        if status == PumpPoll::Pending {
            return Ok(PollOutcome::Running { forwarded });
        }

        let Some(pump) = self.running.take() else {
            return Ok(PollOutcome::Idle);
        };
        let exit_code = self.finish_run(pump.wait())?;
        Ok(PollOutcome::Finished {
            forwarded,
            exit_code,
        })
    }

    /// Records the simulation's exit. A failed wait counts as a failed run.
    fn finish_run(&mut self, waited: io::Result<i32>) -> Result<i32, SessionError> {
        let exit_code = *waited.as_ref().unwrap_or(&-1);
        self.last_exit_code = Some(exit_code);
        self.transition(self.state.on_run_finished(exit_code));
        if exit_code == 0 {
            self.transcript.append("Icarus Verilog simulation ... successful");
        } else {
            self.transcript.append("Icarus Verilog simulation ... failed");
        }
        waited.inspect_err(|e| warn!(error = %e, "failed to wait for simulation"))?;
        info!(exit_code, "simulation finished");
        Ok(exit_code)
    }

    /// Stops pumping a running simulation. The process is not killed and the
    /// state is left unchanged. Returns `false` if nothing was running.
    pub fn cancel(&mut self) -> bool {
        match self.running.take() {
            Some(pump) => {
                pump.abandon();
                self.transcript
                    .append("Icarus Verilog simulation ... output abandoned");
                true
            }
            None => false,
        }
    }

    /// Opens the waveform dump in the viewer without waiting for it.
    pub fn view_wave(&mut self) -> Result<(), SessionError> {
        self.ensure_enabled(Action::ViewWave)?;
        self.require_tool(Tool::Viewer)?;

        self.transcript.append("Launching GTKWave waveform viewer");
        let command = self.builder.view();
        let child = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!(pid = child.id(), command = %command, "viewer launched");
        pump::reap_detached(child);
        Ok(())
    }

    /// Copies the waveform dump to `dest`, creating parent directories.
    pub fn export_waveform(&self, dest: &Path) -> Result<u64, SessionError> {
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::copy(self.builder.waveform_path(), dest)?)
    }

    /// Ends the session, removing its workspace.
    ///
    /// A running simulation is abandoned first.
    pub fn close(mut self) -> Result<(), SessionError> {
        self.cancel();
        self.workspace.close()?;
        Ok(())
    }

    fn transition(&mut self, next: SimulationState) {
        if next != self.state {
            debug!(from = %self.state, to = %next, "state transition");
        }
        self.state = next;
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        Ok(())
    }

    fn ensure_enabled(&self, action: Action) -> Result<(), SessionError> {
        if !self.state.is_enabled(action) {
            return Err(SessionError::ActionDisabled {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Checks that `tool` is installed, reporting to the transcript if not.
    fn require_tool(&mut self, tool: Tool) -> Result<(), SessionError> {
        let program = self.builder.tools().program(tool).to_string();
        if tool::locate(&program).is_some() {
            return Ok(());
        }
        warn!(%tool, %program, "tool not installed");
        self.transcript.append(&format!(
            "{} does not appear to be installed correctly ({program} not found).",
            tool.product()
        ));
        self.transcript.append(&format!(
            "Get {} from {}",
            tool.product(),
            tool.homepage()
        ));
        Err(SessionError::ToolNotInstalled { tool, program })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticResolver;
    use crate::transcript::MemoryTranscript;

    fn missing_tools() -> ToolSet {
        ToolSet {
            compiler: "/no/such/iverilog".into(),
            runtime: "/no/such/vvp".into(),
            viewer: "/no/such/gtkwave".into(),
        }
    }

    fn session(files: Vec<PathBuf>) -> Session<MemoryTranscript> {
        let mut config = SessionConfig::new("counter_tb");
        config.tools = missing_tools();
        Session::new(
            config,
            Box::new(StaticResolver::new(files)),
            MemoryTranscript::new(),
        )
        .unwrap()
    }

    #[test]
    fn starts_in_start_state() {
        let s = session(vec![]);
        assert_eq!(s.state(), SimulationState::Start);
        assert!(!s.is_running());
        assert!(s.is_enabled(Action::Compile));
        assert!(!s.is_enabled(Action::Run));
        assert!(!s.is_enabled(Action::ViewWave));
        assert!(s.workspace().path().is_dir());
    }

    #[test]
    fn from_project_copies_settings() {
        let config = ivy_config::load_config_from_str(
            "[project]\nname = \"p\"\ntop = \"tb\"\n\n[run]\ntime = 10\nunit = \"ns\"\n\n[pump]\ninterval_ms = 20\nbatch_lines = 7\n",
        )
        .unwrap();
        let sc = SessionConfig::from_project(&config).unwrap();
        assert_eq!(sc.top, "tb");
        assert_eq!(sc.run_time.to_string(), "10 ns");
        assert_eq!(sc.poll_interval, Duration::from_millis(20));
        assert_eq!(sc.batch_lines, 7);
        assert_eq!(sc.tools.compiler, "iverilog");
    }

    #[test]
    fn time_changes_force_start() {
        for state in [
            SimulationState::Start,
            SimulationState::Compiled,
            SimulationState::Run,
        ] {
            let mut s = session(vec![]);
            s.state = state;
            s.set_time_value(10).unwrap();
            assert_eq!(s.state(), SimulationState::Start);

            s.state = state;
            s.set_time_unit(TimeUnit::Ns).unwrap();
            assert_eq!(s.state(), SimulationState::Start);
            assert_eq!(s.run_time().to_string(), "10 ns");
        }
    }

    #[test]
    fn zero_time_value_is_rejected_and_keeps_state() {
        let mut s = session(vec![]);
        s.state = SimulationState::Compiled;
        assert!(matches!(
            s.set_time_value(0),
            Err(SessionError::InvalidRunTime(_))
        ));
        assert_eq!(s.state(), SimulationState::Compiled);
        assert_eq!(s.run_time(), RunTime::default());
    }

    #[test]
    fn changing_top_forces_start() {
        let mut s = session(vec![]);
        s.state = SimulationState::Run;
        s.set_top("alu_tb");
        assert_eq!(s.state(), SimulationState::Start);
        assert!(s.settings_source().contains("$dumpvars(0, alu_tb);"));
    }

    #[test]
    fn settings_source_tracks_run_time() {
        let mut s = session(vec![]);
        s.set_run_time(RunTime::new(10, TimeUnit::Ns).unwrap());
        let before = s.settings_source();
        assert!(before.contains("#10000\n"));
        s.set_time_value(20).unwrap();
        let after = s.settings_source();
        assert!(after.contains("#20000\n"));
        assert_ne!(before, after);
    }

    #[test]
    fn regenerate_replaces_files_and_resets_state() {
        let files = vec![PathBuf::from("a.v"), PathBuf::from("b.v")];
        let mut s = session(files.clone());
        s.state = SimulationState::Run;
        assert_eq!(s.regenerate().unwrap(), files.as_slice());
        assert_eq!(s.files(), files.as_slice());
        assert_eq!(s.state(), SimulationState::Start);
        assert!(s.transcript().contains("Generating all dependencies"));
    }

    #[test]
    fn failed_regenerate_keeps_previous_files() {
        let mut config = SessionConfig::new("tb");
        config.files = vec![PathBuf::from("old.v")];
        let mut s = Session::new(
            config,
            Box::new(StaticResolver::default()),
            MemoryTranscript::new(),
        )
        .unwrap();
        assert!(matches!(s.regenerate(), Err(SessionError::Resolve(_))));
        assert_eq!(s.files(), [PathBuf::from("old.v")].as_slice());
        assert!(s.transcript().contains("Dependency generation failed"));
    }

    #[test]
    fn compile_without_compiler_reports_and_keeps_state() {
        let mut s = session(vec![PathBuf::from("a.v")]);
        s.state = SimulationState::Compiled;
        let err = s.compile().unwrap_err();
        assert!(matches!(
            err,
            SessionError::ToolNotInstalled {
                tool: Tool::Compiler,
                ..
            }
        ));
        assert_eq!(s.state(), SimulationState::Compiled);
        assert!(s.transcript().contains("does not appear to be installed"));
        assert!(s.transcript().contains("http://iverilog.icarus.com"));
        assert!(!s.workspace().settings_path().exists());
    }

    #[test]
    fn run_is_disabled_in_start() {
        let mut s = session(vec![]);
        let err = s.run().unwrap_err();
        assert!(matches!(
            err,
            SessionError::ActionDisabled {
                action: Action::Run,
                state: SimulationState::Start
            }
        ));
    }

    #[test]
    fn run_without_runtime_reports_and_keeps_state() {
        let mut s = session(vec![]);
        s.state = SimulationState::Compiled;
        assert!(matches!(
            s.run(),
            Err(SessionError::ToolNotInstalled {
                tool: Tool::Runtime,
                ..
            })
        ));
        assert_eq!(s.state(), SimulationState::Compiled);
        assert!(!s.is_running());
    }

    #[test]
    fn view_wave_gated_then_tool_checked() {
        let mut s = session(vec![]);
        s.state = SimulationState::Compiled;
        assert!(matches!(
            s.view_wave(),
            Err(SessionError::ActionDisabled { .. })
        ));
        s.state = SimulationState::Run;
        assert!(matches!(
            s.view_wave(),
            Err(SessionError::ToolNotInstalled {
                tool: Tool::Viewer,
                ..
            })
        ));
        assert!(s.transcript().contains("GTKWave"));
    }

    #[test]
    fn failed_compiler_wait_resets_to_start() {
        let mut s = session(vec![]);
        s.state = SimulationState::Compiled;
        let lost = io::Error::other("no child process");
        assert!(matches!(s.finish_compile(Err(lost)), Err(SessionError::Io(_))));
        assert_eq!(s.state(), SimulationState::Start);
        assert_eq!(s.last_exit_code(), Some(-1));
        assert!(s.transcript().contains("Icarus Verilog compile ... failed"));
    }

    #[test]
    fn failed_simulation_wait_is_recorded_as_failure() {
        let mut s = session(vec![]);
        s.state = SimulationState::Compiled;
        let lost = io::Error::other("no child process");
        assert!(matches!(s.finish_run(Err(lost)), Err(SessionError::Io(_))));
        assert_eq!(s.state(), SimulationState::Run);
        assert_eq!(s.last_exit_code(), Some(-1));
        assert!(s.transcript().contains("Icarus Verilog simulation ... failed"));
    }

    #[test]
    fn poll_and_cancel_when_idle() {
        let mut s = session(vec![]);
        assert_eq!(s.poll().unwrap(), PollOutcome::Idle);
        assert!(!s.cancel());
    }

    #[test]
    fn close_removes_workspace() {
        let s = session(vec![]);
        let dir = s.workspace().path().to_path_buf();
        s.close().unwrap();
        assert!(!dir.exists());
    }
}
