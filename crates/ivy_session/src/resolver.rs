//! Dependency resolvers that produce the ordered file set for a component.

use std::path::{Path, PathBuf};

use ivy_config::ProjectConfig;
use tracing::debug;

use crate::error::ResolveError;

/// Computes the ordered list of source files needed to simulate a component.
pub trait DependencyResolver {
    /// Returns the files for `top`, in compile order.
    fn regenerate(&mut self, top: &str) -> Result<Vec<PathBuf>, ResolveError>;
}

/// A resolver that always returns the same explicit file list.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    files: Vec<PathBuf>,
}

impl StaticResolver {
    /// Creates a resolver returning `files` unchanged.
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl DependencyResolver for StaticResolver {
    fn regenerate(&mut self, top: &str) -> Result<Vec<PathBuf>, ResolveError> {
        if self.files.is_empty() {
            return Err(ResolveError::NoSources {
                top: top.to_string(),
            });
        }
        Ok(self.files.clone())
    }
}

/// A resolver that collects Verilog sources from directories on disk.
///
/// Every call rescans, so files added since the last regenerate are picked up.
#[derive(Clone, Debug)]
pub struct SourceDirResolver {
    dirs: Vec<PathBuf>,
}

impl SourceDirResolver {
    /// Creates a resolver scanning `dirs` recursively.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl DependencyResolver for SourceDirResolver {
    fn regenerate(&mut self, top: &str) -> Result<Vec<PathBuf>, ResolveError> {
        let mut files = Vec::new();
        for dir in &self.dirs {
            if !dir.is_dir() {
                return Err(ResolveError::MissingDirectory(dir.clone()));
            }
            walk_dir(dir, &mut files)?;
        }
        files.sort();
        files.dedup();
        debug!(top, count = files.len(), "resolved source files");
        if files.is_empty() {
            return Err(ResolveError::NoSources {
                top: top.to_string(),
            });
        }
        Ok(files)
    }
}

/// Recursively walks a directory collecting Verilog source files.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if is_verilog_source(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns whether `path` has a Verilog source extension (`.v`, `.sv`).
///
/// Header files (`.vh`, `.svh`) are pulled in by `` `include `` and must
/// not be passed to the compiler separately.
pub fn is_verilog_source(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("v" | "sv")
    )
}

/// Builds the resolver described by a project configuration.
///
/// An explicit `project.files` list wins; otherwise `project.sources`
/// directories are scanned. Relative paths are taken from `project_root`.
pub fn resolver_for(config: &ProjectConfig, project_root: &Path) -> Box<dyn DependencyResolver> {
    if config.project.files.is_empty() {
        let dirs = config
            .project
            .sources
            .iter()
            .map(|d| project_root.join(d))
            .collect();
        Box::new(SourceDirResolver::new(dirs))
    } else {
        let files = config
            .project
            .files
            .iter()
            .map(|f| project_root.join(f))
            .collect();
        Box::new(StaticResolver::new(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn static_resolver_returns_files_in_order() {
        let files = vec![PathBuf::from("b.v"), PathBuf::from("a.v")];
        let mut r = StaticResolver::new(files.clone());
        assert_eq!(r.regenerate("tb").unwrap(), files);
    }

    #[test]
    fn static_resolver_empty_is_error() {
        let mut r = StaticResolver::default();
        assert!(matches!(
            r.regenerate("tb"),
            Err(ResolveError::NoSources { ref top }) if top == "tb"
        ));
    }

    #[test]
    fn source_dir_resolver_scans_recursively_and_sorts() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("top.v"), "module top; endmodule").unwrap();
        fs::write(src.join("sub").join("alu.sv"), "module alu; endmodule").unwrap();
        fs::write(src.join("defs.vh"), "`define W 8").unwrap();
        fs::write(src.join("README.md"), "docs").unwrap();

        let mut r = SourceDirResolver::new(vec![src.clone()]);
        let files = r.regenerate("top").unwrap();
        assert_eq!(files, vec![src.join("sub").join("alu.sv"), src.join("top.v")]);
    }

    #[test]
    fn source_dir_resolver_picks_up_new_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.v"), "").unwrap();
        let mut r = SourceDirResolver::new(vec![tmp.path().to_path_buf()]);
        assert_eq!(r.regenerate("a").unwrap().len(), 1);
        fs::write(tmp.path().join("b.v"), "").unwrap();
        assert_eq!(r.regenerate("a").unwrap().len(), 2);
    }

    #[test]
    fn source_dir_resolver_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let mut r = SourceDirResolver::new(vec![tmp.path().join("rtl")]);
        assert!(matches!(
            r.regenerate("tb"),
            Err(ResolveError::MissingDirectory(_))
        ));
    }

    #[test]
    fn source_dir_resolver_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let mut r = SourceDirResolver::new(vec![tmp.path().to_path_buf()]);
        assert!(matches!(r.regenerate("tb"), Err(ResolveError::NoSources { .. })));
    }

    #[test]
    fn resolver_for_prefers_explicit_files() {
        let tmp = TempDir::new().unwrap();
        let config = ivy_config::load_config_from_str(
            "[project]\nname = \"p\"\ntop = \"tb\"\nfiles = [\"rtl/b.v\", \"rtl/a.v\"]\n",
        )
        .unwrap();
        let mut r = resolver_for(&config, tmp.path());
        let files = r.regenerate("tb").unwrap();
        assert_eq!(
            files,
            vec![tmp.path().join("rtl/b.v"), tmp.path().join("rtl/a.v")]
        );
    }

    #[test]
    fn resolver_for_scans_sources() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(tmp.path().join("src").join("tb.v"), "").unwrap();
        let config =
            ivy_config::load_config_from_str("[project]\nname = \"p\"\ntop = \"tb\"\n").unwrap();
        let mut r = resolver_for(&config, tmp.path());
        assert_eq!(r.regenerate("tb").unwrap(), vec![tmp.path().join("src").join("tb.v")]);
    }

    #[test]
    fn verilog_extensions() {
        assert!(is_verilog_source(Path::new("a.v")));
        assert!(is_verilog_source(Path::new("a.sv")));
        assert!(!is_verilog_source(Path::new("a.vh")));
        assert!(!is_verilog_source(Path::new("a.vhd")));
    }
}
