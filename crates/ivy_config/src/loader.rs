//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use ivy_common::RunTime;
use std::path::Path;

/// The name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "ivy.toml";

/// Loads and validates an `ivy.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `ivy.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.top.is_empty() {
        return Err(ConfigError::MissingField("project.top".to_string()));
    }
    if !(RunTime::MIN_VALUE..=RunTime::MAX_VALUE).contains(&config.run.time) {
        return Err(ConfigError::ValidationError(format!(
            "run.time must be between {} and {}, got {}",
            RunTime::MIN_VALUE,
            RunTime::MAX_VALUE,
            config.run.time
        )));
    }
    for (name, program) in [
        ("tools.compiler", &config.tools.compiler),
        ("tools.runtime", &config.tools.runtime),
        ("tools.viewer", &config.tools.viewer),
    ] {
        if program.trim().is_empty() {
            return Err(ConfigError::MissingField(name.to_string()));
        }
    }
    if config.pump.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "pump.interval_ms must be positive".to_string(),
        ));
    }
    if config.pump.batch_lines == 0 {
        return Err(ConfigError::ValidationError(
            "pump.batch_lines must be positive".to_string(),
        ));
    }
    Ok(())
}
