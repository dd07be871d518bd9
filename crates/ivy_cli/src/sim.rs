//! Implementation of the `ivy sim` command.
//!
//! Runs one full regenerate → compile → run cycle without a UI, polling the
//! simulation at the configured interval, then exports the waveform dump.

use std::path::{Path, PathBuf};
use std::thread;

use ivy_common::RunTime;
use ivy_config::ProjectConfig;
use ivy_session::{MemoryTranscript, PollOutcome, Session, StdoutTranscript, Transcript};
use serde::Serialize;
use tracing::warn;

use crate::pipeline::{build_session, default_waveform_output, load_project};
use crate::{GlobalArgs, SimArgs};

/// Outcome of one headless simulation.
#[derive(Debug, Serialize)]
pub struct SimReport {
    /// Top-level component that was simulated.
    pub top: String,
    /// Run time, e.g. `"10 ns"`.
    pub run_time: String,
    /// Number of files compiled.
    pub files: usize,
    /// Compiler exit code.
    pub compile_exit_code: i32,
    /// Runtime exit code, absent if compilation failed.
    pub simulation_exit_code: Option<i32>,
    /// Where the waveform was exported, if it was.
    pub waveform: Option<PathBuf>,
    /// Transcript lines, filled only for `--json`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transcript: Vec<String>,
}

impl SimReport {
    /// Returns `true` if both the compile and the simulation exited with 0.
    pub fn success(&self) -> bool {
        self.compile_exit_code == 0 && self.simulation_exit_code == Some(0)
    }
}

/// Runs the `ivy sim` command. Returns exit code 0 only on full success.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (root, config) = load_project(global)?;

    let report = if args.json || global.quiet {
        let mut session = build_session(&root, &config, MemoryTranscript::new())?;
        let mut report = simulate(&mut session, args, &root, &config)?;
        if args.json {
            report.transcript = session.transcript().lines().map(str::to_string).collect();
        }
        session.close()?;
        report
    } else {
        let mut session = build_session(&root, &config, StdoutTranscript)?;
        let report = simulate(&mut session, args, &root, &config)?;
        session.close()?;
        report
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !global.quiet {
        print_summary(&report);
    }

    Ok(if report.success() { 0 } else { 1 })
}

/// Drives `session` through one cycle and exports the waveform.
pub fn simulate<T: Transcript>(
    session: &mut Session<T>,
    args: &SimArgs,
    root: &Path,
    config: &ProjectConfig,
) -> Result<SimReport, Box<dyn std::error::Error>> {
    if let Some(top) = &args.top {
        session.set_top(top.clone());
    }
    if let Some(time) = &args.time {
        let run_time: RunTime = time
            .parse()
            .map_err(|e| format!("invalid --time '{time}': {e}"))?;
        session.set_run_time(run_time);
    }

    let files = session.regenerate()?.len();
    let mut report = SimReport {
        top: session.top().to_string(),
        run_time: session.run_time().to_string(),
        files,
        compile_exit_code: 0,
        simulation_exit_code: None,
        waveform: None,
        transcript: Vec::new(),
    };

    let compile = session.compile()?;
    report.compile_exit_code = compile.exit_code;
    if !compile.succeeded() {
        return Ok(report);
    }

    session.run()?;
    let exit_code = loop {
        match session.poll()? {
            PollOutcome::Finished { exit_code, .. } => break exit_code,
            PollOutcome::Running { .. } => thread::sleep(session.poll_interval()),
            PollOutcome::Idle => return Err("simulation stopped unexpectedly".into()),
        }
    };
    report.simulation_exit_code = Some(exit_code);

    let dest = args
        .output
        .as_ref()
        .map(|o| root.join(o))
        .unwrap_or_else(|| default_waveform_output(root, config, &report.top));
    match session.export_waveform(&dest) {
        Ok(_) => report.waveform = Some(dest),
        Err(e) => warn!(error = %e, "no waveform to export"),
    }

    if args.view && report.success() && report.waveform.is_some() {
        session.view_wave()?;
    }
    Ok(report)
}

fn print_summary(report: &SimReport) {
    let status = if report.success() { "ok" } else { "FAILED" };
    eprintln!(
        "    Finished {} ({}, {} file(s)): {status}",
        report.top, report.run_time, report.files
    );
    if let Some(path) = &report.waveform {
        eprintln!("    Waveform {}", path.display());
    }
}
