//! Ivy CLI: command-line front-end for Icarus Verilog simulation sessions.
//!
//! Provides `ivy init` for project scaffolding, `ivy tui` for the interactive
//! front-end, `ivy sim` for a headless regenerate/compile/run cycle, and
//! `ivy view` for opening a saved waveform in GTKWave.

#![warn(missing_docs)]

mod init;
mod pipeline;
mod sim;
mod tui;
mod view;

use std::process;

use clap::{Parser, Subcommand};

/// Ivy: drive Icarus Verilog and GTKWave from one place.
#[derive(Parser, Debug)]
#[command(name = "ivy", version, about = "Icarus Verilog simulation front-end")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `ivy.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Ivy project.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes in
        /// the current directory.
        name: Option<String>,

        /// Name of the design module; the testbench is `<top>_tb`.
        #[arg(long, default_value = "counter")]
        top: String,
    },
    /// Open the interactive terminal front-end.
    Tui,
    /// Regenerate, compile and run the project without a UI.
    Sim(SimArgs),
    /// Open a waveform file in the viewer.
    View(ViewArgs),
}

/// Arguments for the `ivy sim` subcommand.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// Run time (e.g., "10ns", "1 us"). Overrides `run` in `ivy.toml`.
    #[arg(long)]
    pub time: Option<String>,

    /// Override the top-level component.
    #[arg(long)]
    pub top: Option<String>,

    /// Where to copy the waveform dump, relative to the project root
    /// (default: `out/<top>.<ext>`).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Open the waveform in the viewer after a successful run.
    #[arg(long)]
    pub view: bool,

    /// Print a JSON summary, including the transcript, instead of
    /// streaming tool output.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `ivy view` subcommand.
#[derive(Parser, Debug)]
pub struct ViewArgs {
    /// Waveform file (default: the project's `out/<top>.<ext>`).
    pub file: Option<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    // The TUI owns the terminal; log lines would corrupt it.
    if !matches!(cli.command, Command::Tui) {
        pipeline::init_logging(&global);
    }

    let result = match cli.command {
        Command::Init { name, top } => init::run(name, &top, &global),
        Command::Tui => tui::run(&global),
        Command::Sim(ref args) => sim::run(args, &global),
        Command::View(ref args) => view::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
