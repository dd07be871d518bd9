//! Command construction for the external tools.
//!
//! [`CommandBuilder`] produces the settings source and the compile, run and
//! view invocations from the current session inputs. Nothing is cached: every
//! call rebuilds its output from the arguments it is given.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use ivy_common::SimulatedDuration;
use ivy_config::WaveformFormat;

use crate::tool::{Tool, ToolSet};
use crate::workspace::SessionWorkspace;

/// A fully-formed invocation of one external tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    /// Which tool this invokes.
    pub tool: Tool,
    /// Program name or path.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<OsString>,
}

impl ToolCommand {
    /// Creates a command for `tool` running `program` with no arguments.
    pub fn new(tool: Tool, program: impl Into<String>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Builds a [`std::process::Command`] for this invocation.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Renders the invocation as a shell-style command line for display.
    pub fn command_line(&self) -> String {
        let mut line = quote(&self.program);
        for arg in &self.args {
            line.push(' ');
            line.push_str(&quote(&arg.to_string_lossy()));
        }
        line
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

fn quote(word: &str) -> String {
    if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Builds settings text and tool invocations for one session workspace.
#[derive(Clone, Debug)]
pub struct CommandBuilder {
    tools: ToolSet,
    format: WaveformFormat,
    settings_path: PathBuf,
    object_path: PathBuf,
    waveform_path: PathBuf,
}

impl CommandBuilder {
    /// Creates a builder targeting the files of `workspace`.
    pub fn new(tools: ToolSet, format: WaveformFormat, workspace: &SessionWorkspace) -> Self {
        Self {
            tools,
            format,
            settings_path: workspace.settings_path(),
            object_path: workspace.object_path(),
            waveform_path: workspace.waveform_path(),
        }
    }

    /// Returns the configured tool programs.
    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Returns the path the settings source is written to.
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Returns the path of the waveform dump.
    pub fn waveform_path(&self) -> &Path {
        &self.waveform_path
    }

    /// Generates the settings module source.
    ///
    /// The module dumps every signal under `top` to the waveform file and
    /// calls `$finish` after `duration`. The timescale is `1ps/1fs` and the
    /// delay is written as an exact picosecond literal.
    pub fn settings_source(&self, top: &str, duration: SimulatedDuration) -> String {
        let wave = verilog_string(&self.waveform_path.to_string_lossy());
        let delay = duration.picosecond_literal();
        format!(
            "`timescale 1ps/1fs
module settings();
  initial begin
    $dumpfile(\"{wave}\");
    $dumpvars(0, {top});
  end
  initial begin
    #{delay}
    $finish;
  end
endmodule
"
        )
    }

    /// `<compiler> -o <object> <settings> <file...>`
    pub fn compile(&self, files: &[PathBuf]) -> ToolCommand {
        let mut command = ToolCommand::new(Tool::Compiler, self.tools.program(Tool::Compiler))
            .arg("-o")
            .arg(&self.object_path)
            .arg(&self.settings_path);
        command.args.extend(files.iter().map(|f| f.as_os_str().to_os_string()));
        command
    }

    /// `<runtime> <object> -<waveform flag>`
    pub fn run(&self) -> ToolCommand {
        ToolCommand::new(Tool::Runtime, self.tools.program(Tool::Runtime))
            .arg(&self.object_path)
            .arg(format!("-{}", self.format.runtime_flag()))
    }

    /// `<viewer> <waveform>`
    pub fn view(&self) -> ToolCommand {
        ToolCommand::new(Tool::Viewer, self.tools.program(Tool::Viewer)).arg(&self.waveform_path)
    }
}

/// Escapes a path for use inside a Verilog string literal.
fn verilog_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivy_common::{RunTime, TimeUnit};

    fn builder(format: WaveformFormat) -> (SessionWorkspace, CommandBuilder) {
        let ws = SessionWorkspace::create(format).unwrap();
        let b = CommandBuilder::new(ToolSet::default(), format, &ws);
        (ws, b)
    }

    fn duration(value: u32, unit: TimeUnit) -> SimulatedDuration {
        RunTime::new(value, unit).unwrap().duration()
    }

    #[test]
    fn settings_embed_top_wave_and_delay() {
        let (ws, b) = builder(WaveformFormat::Lxt2);
        let text = b.settings_source("counter_tb", duration(10, TimeUnit::Ns));
        assert!(text.starts_with("`timescale 1ps/1fs\n"));
        assert!(text.contains("module settings();"));
        assert!(text.contains(&format!(
            "$dumpfile(\"{}\");",
            ws.waveform_path().display()
        )));
        assert!(text.contains("$dumpvars(0, counter_tb);"));
        assert!(text.contains("#10000\n"));
        assert!(text.contains("$finish;"));
        assert!(text.trim_end().ends_with("endmodule"));
    }

    #[test]
    fn settings_follow_every_input_change() {
        let (_ws, b) = builder(WaveformFormat::Lxt2);
        let a = b.settings_source("tb", duration(1, TimeUnit::Us));
        let c = b.settings_source("tb", duration(2, TimeUnit::Us));
        let d = b.settings_source("other_tb", duration(1, TimeUnit::Us));
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert!(a.contains("#1000000\n"));
        assert!(c.contains("#2000000\n"));
        assert!(d.contains("$dumpvars(0, other_tb);"));
    }

    #[test]
    fn sub_picosecond_delay_is_fractional() {
        let (_ws, b) = builder(WaveformFormat::Lxt2);
        let text = b.settings_source("tb", duration(5, TimeUnit::Fs));
        assert!(text.contains("#0.005\n"));
    }

    #[test]
    fn compile_command_lists_settings_then_files() {
        let (ws, b) = builder(WaveformFormat::Lxt2);
        let files = vec![PathBuf::from("src/counter.v"), PathBuf::from("tests/tb.v")];
        let cmd = b.compile(&files);
        assert_eq!(cmd.tool, Tool::Compiler);
        assert_eq!(cmd.program, "iverilog");
        let args: Vec<_> = cmd.args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args[0], "-o");
        assert_eq!(PathBuf::from(&args[1]), ws.object_path());
        assert_eq!(PathBuf::from(&args[2]), ws.settings_path());
        assert_eq!(&args[3..], ["src/counter.v", "tests/tb.v"]);
    }

    #[test]
    fn run_command_uses_waveform_flag() {
        let (ws, b) = builder(WaveformFormat::Lxt2);
        let cmd = b.run();
        assert_eq!(cmd.program, "vvp");
        assert_eq!(cmd.args.len(), 2);
        assert_eq!(PathBuf::from(&cmd.args[0]), ws.object_path());
        assert_eq!(cmd.args[1], "-lxt2");

        let (_ws, vcd) = builder(WaveformFormat::Vcd);
        assert_eq!(vcd.run().args[1], "-vcd");
    }

    #[test]
    fn view_command_opens_waveform() {
        let (ws, b) = builder(WaveformFormat::Fst);
        let cmd = b.view();
        assert_eq!(cmd.program, "gtkwave");
        assert_eq!(PathBuf::from(&cmd.args[0]), ws.waveform_path());
    }

    #[test]
    fn command_line_quotes_whitespace() {
        let cmd = ToolCommand::new(Tool::Viewer, "gtkwave").arg("my wave.vcd");
        assert_eq!(cmd.command_line(), "gtkwave 'my wave.vcd'");
        let plain = ToolCommand::new(Tool::Runtime, "vvp").arg("obj").arg("-lxt2");
        assert_eq!(plain.to_string(), "vvp obj -lxt2");
    }

    #[test]
    fn verilog_string_escapes() {
        assert_eq!(verilog_string(r"C:\tmp\wave.lxt"), r"C:\\tmp\\wave.lxt");
        assert_eq!(verilog_string("a\"b"), "a\\\"b");
    }
}
