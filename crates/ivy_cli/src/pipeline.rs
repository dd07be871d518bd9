//! Shared helpers for CLI commands.
//!
//! Project root resolution, configuration loading, logging setup and
//! session construction used by `sim`, `tui` and `view`.

use std::path::{Path, PathBuf};

use ivy_config::{load_config, ProjectConfig, CONFIG_FILE_NAME};
use ivy_session::{resolver_for, Session, SessionConfig, Transcript};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Installs the stderr log subscriber.
///
/// WARN by default, DEBUG with `--verbose`, ERROR with `--quiet`. `RUST_LOG`
/// overrides the level when set.
pub fn init_logging(global: &GlobalArgs) {
    let level = log_level(global);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn log_level(global: &GlobalArgs) -> Level {
    if global.quiet {
        Level::ERROR
    } else if global.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Walks up from `start` looking for the nearest directory containing `ivy.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `ivy.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match &global.config {
        Some(config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_file() {
                Ok(p.parent()
                    .filter(|d| !d.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")))
            } else {
                Ok(p)
            }
        }
        None => find_project_root(&std::env::current_dir()?),
    }
}

/// Locates and loads the project configuration.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let config = load_config(&root)
        .map_err(|e| format!("{}: {e}", root.join(CONFIG_FILE_NAME).display()))?;
    Ok((root, config))
}

/// Default destination for an exported waveform: `<root>/out/<top>.<ext>`.
pub fn default_waveform_output(root: &Path, config: &ProjectConfig, top: &str) -> PathBuf {
    root.join("out")
        .join(format!("{top}.{}", config.waveform.format.extension()))
}

/// Creates a session for the project at `root`.
pub fn build_session<T: Transcript>(
    root: &Path,
    config: &ProjectConfig,
    transcript: T,
) -> Result<Session<T>, Box<dyn std::error::Error>> {
    let session_config = SessionConfig::from_project(config)?;
    let resolver = resolver_for(config, root);
    Ok(Session::new(session_config, resolver, transcript)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivy_session::MemoryTranscript;
    use std::fs;
    use tempfile::TempDir;

    const MINIMAL: &str = "[project]\nname = \"t\"\ntop = \"counter_tb\"\n";

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
            config,
        }
    }

    #[test]
    fn find_project_root_in_current_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ivy.toml"), MINIMAL).unwrap();
        assert_eq!(find_project_root(tmp.path()).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ivy.toml"), MINIMAL).unwrap();
        let sub = tmp.path().join("src").join("deep");
        fs::create_dir_all(&sub).unwrap();
        assert_eq!(find_project_root(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = find_project_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("could not find ivy.toml"));
    }

    #[test]
    fn config_flag_accepts_file_or_dir() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("ivy.toml");
        fs::write(&file, MINIMAL).unwrap();

        let from_file =
            resolve_project_root(&global(Some(file.to_string_lossy().into_owned()))).unwrap();
        assert_eq!(from_file, tmp.path());

        let from_dir =
            resolve_project_root(&global(Some(tmp.path().to_string_lossy().into_owned())))
                .unwrap();
        assert_eq!(from_dir, tmp.path());
    }

    #[test]
    fn load_project_reports_config_path_on_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ivy.toml"), "[project]\nname = \"\"\ntop = \"t\"\n").unwrap();
        let err = load_project(&global(Some(tmp.path().to_string_lossy().into_owned())))
            .unwrap_err()
            .to_string();
        assert!(err.contains("ivy.toml"));
        assert!(err.contains("project.name"));
    }

    #[test]
    fn default_output_uses_format_extension() {
        let config = ivy_config::load_config_from_str(
            "[project]\nname = \"t\"\ntop = \"tb\"\n\n[waveform]\nformat = \"vcd\"\n",
        )
        .unwrap();
        assert_eq!(
            default_waveform_output(Path::new("/proj"), &config, "tb"),
            Path::new("/proj/out/tb.vcd")
        );
    }

    #[test]
    fn build_session_uses_project_settings() {
        let tmp = TempDir::new().unwrap();
        let config = ivy_config::load_config_from_str(
            "[project]\nname = \"t\"\ntop = \"counter_tb\"\n\n[run]\ntime = 10\nunit = \"ns\"\n",
        )
        .unwrap();
        let session = build_session(tmp.path(), &config, MemoryTranscript::new()).unwrap();
        assert_eq!(session.top(), "counter_tb");
        assert_eq!(session.run_time().to_string(), "10 ns");
        assert!(session.files().is_empty());
    }

    #[test]
    fn log_levels_follow_flags() {
        let mut g = global(None);
        assert_eq!(log_level(&g), Level::WARN);
        g.verbose = true;
        assert_eq!(log_level(&g), Level::DEBUG);
        g.quiet = true;
        assert_eq!(log_level(&g), Level::ERROR);
    }
}
