//! Configuration types deserialized from `ivy.toml`.

use ivy_common::{ParseRunTimeError, RunTime, TimeUnit};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level project configuration parsed from `ivy.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, top-level component, sources).
    pub project: ProjectMeta,
    /// Simulation run time.
    #[serde(default)]
    pub run: RunConfig,
    /// External tool programs.
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Waveform dump settings.
    #[serde(default)]
    pub waveform: WaveformConfig,
    /// Output pump tuning.
    #[serde(default)]
    pub pump: PumpConfig,
}

/// Core project metadata required in every `ivy.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// Name of the top-level component to simulate.
    pub top: String,
    /// Directories searched for Verilog sources, relative to the project root.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(default = "default_sources", deserialize_with = "deserialize_string_or_vec")]
    pub sources: Vec<String>,
    /// Explicit ordered file list. When non-empty it replaces directory search.
    #[serde(default)]
    pub files: Vec<String>,
}

fn default_sources() -> Vec<String> {
    vec!["src".to_string()]
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `sources = "rtl"` as well as `sources = ["rtl", "tb"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// The `[run]` table: how long the simulation runs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RunConfig {
    /// Integer count of `unit`, in `1..=999`.
    #[serde(default = "default_run_time")]
    pub time: u32,
    /// Unit of `time`.
    #[serde(default)]
    pub unit: TimeUnit,
}

fn default_run_time() -> u32 {
    1
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            time: default_run_time(),
            unit: TimeUnit::default(),
        }
    }
}

impl RunConfig {
    /// Converts the table into a validated [`RunTime`].
    pub fn run_time(&self) -> Result<RunTime, ParseRunTimeError> {
        RunTime::new(self.time, self.unit)
    }
}

/// The `[tools]` table: programs invoked for each external step.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// The Verilog compiler (`iverilog`).
    #[serde(default = "default_compiler")]
    pub compiler: String,
    /// The simulation runtime (`vvp`).
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// The waveform viewer (`gtkwave`).
    #[serde(default = "default_viewer")]
    pub viewer: String,
    /// Editor command line used to open source files. Falls back to
    /// `$VISUAL`, then `$EDITOR`.
    #[serde(default)]
    pub editor: Option<String>,
}

fn default_compiler() -> String {
    "iverilog".to_string()
}

fn default_runtime() -> String {
    "vvp".to_string()
}

fn default_viewer() -> String {
    "gtkwave".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            runtime: default_runtime(),
            viewer: default_viewer(),
            editor: None,
        }
    }
}

/// The `[waveform]` table.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WaveformConfig {
    /// Dump format requested from the simulation runtime.
    #[serde(default)]
    pub format: WaveformFormat,
}

/// Waveform dump format written by the simulation runtime.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WaveformFormat {
    /// Value Change Dump (IEEE 1364).
    Vcd,
    /// LXT.
    Lxt,
    /// LXT2 (default).
    #[default]
    Lxt2,
    /// Fast Signal Trace.
    Fst,
}

impl WaveformFormat {
    /// Returns the runtime flag, without the leading dash.
    pub fn runtime_flag(self) -> &'static str {
        match self {
            WaveformFormat::Vcd => "vcd",
            WaveformFormat::Lxt => "lxt",
            WaveformFormat::Lxt2 => "lxt2",
            WaveformFormat::Fst => "fst",
        }
    }

    /// Returns the file extension of the dump file.
    pub fn extension(self) -> &'static str {
        match self {
            WaveformFormat::Vcd => "vcd",
            WaveformFormat::Lxt | WaveformFormat::Lxt2 => "lxt",
            WaveformFormat::Fst => "fst",
        }
    }
}

/// The `[pump]` table: how the output of a running simulation is drained.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PumpConfig {
    /// Poll interval in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Maximum number of output lines forwarded per poll.
    #[serde(default = "default_batch_lines")]
    pub batch_lines: usize,
}

fn default_interval_ms() -> u64 {
    100
}

fn default_batch_lines() -> usize {
    100
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            batch_lines: default_batch_lines(),
        }
    }
}
