//! `ivy init`: project scaffolding command.
//!
//! Creates an `ivy.toml`, a counter design under `src/` and a testbench
//! under `tests/` that `ivy sim` can run straight away.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ivy_config::CONFIG_FILE_NAME;

use crate::GlobalArgs;

/// Runs the `ivy init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
pub fn run(
    name: Option<String>,
    top: &str,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let created = init_in(&std::env::current_dir()?, name.as_deref(), top)?;
    if !global.quiet {
        for path in &created {
            eprintln!("     Created {}", path.display());
        }
    }
    Ok(0)
}

/// Scaffolds a project under `base`, returning the files written.
fn init_in(
    base: &Path,
    name: Option<&str>,
    top: &str,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if !is_identifier(top) {
        return Err(format!("'{top}' is not a valid Verilog module name").into());
    }

    let project_dir = match name {
        Some(n) => {
            let dir = base.join(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => base.to_path_buf(),
    };
    if project_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(format!(
            "{CONFIG_FILE_NAME} already exists in {}",
            project_dir.display()
        )
        .into());
    }

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("my_project");

    fs::create_dir_all(project_dir.join("src"))?;
    fs::create_dir_all(project_dir.join("tests"))?;

    let files = [
        (
            project_dir.join(CONFIG_FILE_NAME),
            config_template(project_name, top),
        ),
        (
            project_dir.join("src").join(format!("{top}.v")),
            design_template(top),
        ),
        (
            project_dir.join("tests").join(format!("{top}_tb.v")),
            testbench_template(top),
        ),
    ];
    for (path, content) in &files {
        write_new(path, content)?;
    }
    Ok(files.into_iter().map(|(path, _)| path).collect())
}

fn write_new(path: &Path, content: &str) -> io::Result<()> {
    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        ));
    }
    fs::write(path, content)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn config_template(name: &str, top: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
top = "{top}_tb"
sources = ["src", "tests"]

[run]
time = 1
unit = "us"

[tools]
compiler = "iverilog"
runtime = "vvp"
viewer = "gtkwave"
# editor = "code -w"

[waveform]
format = "lxt2"
"#
    )
}

fn design_template(top: &str) -> String {
    format!(
        r#"`timescale 1ns/1ps

module {top} #(
    parameter WIDTH = 8
) (
    input  wire             clk,
    input  wire             rst,
    output reg  [WIDTH-1:0] count
);

    always @(posedge clk) begin
        if (rst)
            count <= {{WIDTH{{1'b0}}}};
        else
            count <= count + 1'b1;
    end

endmodule
"#
    )
}

fn testbench_template(top: &str) -> String {
    format!(
        r#"`timescale 1ns/1ps

module {top}_tb;

    reg        clk = 1'b0;
    reg        rst = 1'b1;
    wire [7:0] count;

    {top} dut (
        .clk   (clk),
        .rst   (rst),
        .count (count)
    );

    always #5 clk = ~clk;

    initial begin
        #20 rst = 1'b0;
    end

endmodule
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivy_session::{resolver_for, DependencyResolver};
    use tempfile::TempDir;

    #[test]
    fn init_creates_project_files() {
        let tmp = TempDir::new().unwrap();
        let created = init_in(tmp.path(), Some("blinky"), "counter").unwrap();
        let root = tmp.path().join("blinky");
        assert_eq!(created.len(), 3);
        assert!(root.join("ivy.toml").is_file());
        assert!(root.join("src").join("counter.v").is_file());
        assert!(root.join("tests").join("counter_tb.v").is_file());
    }

    #[test]
    fn init_generates_loadable_config() {
        let tmp = TempDir::new().unwrap();
        init_in(tmp.path(), Some("blinky"), "alu").unwrap();
        let root = tmp.path().join("blinky");
        let config = ivy_config::load_config(&root).unwrap();
        assert_eq!(config.project.name, "blinky");
        assert_eq!(config.project.top, "alu_tb");
        assert_eq!(config.run.run_time().unwrap().to_string(), "1 us");

        let mut resolver = resolver_for(&config, &root);
        let files = resolver.regenerate("alu_tb").unwrap();
        assert_eq!(
            files,
            vec![root.join("src").join("alu.v"), root.join("tests").join("alu_tb.v")]
        );
    }

    #[test]
    fn templates_reference_top() {
        assert!(design_template("alu").contains("module alu #("));
        assert!(design_template("alu").contains("{WIDTH{1'b0}}"));
        let tb = testbench_template("alu");
        assert!(tb.contains("module alu_tb;"));
        assert!(tb.contains("alu dut ("));
    }

    #[test]
    fn init_in_existing_dir() {
        let tmp = TempDir::new().unwrap();
        init_in(tmp.path(), None, "counter").unwrap();
        assert!(tmp.path().join("ivy.toml").is_file());
    }

    #[test]
    fn init_existing_dir_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("taken")).unwrap();
        let err = init_in(tmp.path(), Some("taken"), "counter").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn init_refuses_to_overwrite_config() {
        let tmp = TempDir::new().unwrap();
        init_in(tmp.path(), None, "counter").unwrap();
        let err = init_in(tmp.path(), None, "counter").unwrap_err();
        assert!(err.to_string().contains("ivy.toml already exists"));
    }

    #[test]
    fn init_rejects_bad_top_name() {
        let tmp = TempDir::new().unwrap();
        assert!(init_in(tmp.path(), None, "9lives").is_err());
        assert!(init_in(tmp.path(), None, "has space").is_err());
        assert!(!tmp.path().join("ivy.toml").exists());
    }
}
