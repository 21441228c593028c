//! Configuration types and loading from `suite-runner.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

pub mod env;
mod loader;
pub use loader::{CONFIG_FILE_NAME, ConfigLoader};

/// Complete configuration for a suite run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Only run suites whose identifier starts with this prefix.
    #[serde(default)]
    pub filter: Option<String>,

    /// Suite discovery configuration.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// External engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Structured log configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Report output configuration.
    #[serde(default)]
    pub output: OutputConfig,

    /// Template variables for engine command substitution.
    #[serde(default)]
    pub variables: HashMap<String, String>,

    /// Named overlays selected with `SUITE_RUNNER_PROFILE`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub profiles: HashMap<String, serde_json::Value>,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration from a standalone TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// The filter prefix, treating an empty string as unset.
    pub fn filter_prefix(&self) -> Option<&str> {
        self.filter.as_deref().filter(|p| !p.is_empty())
    }
}

/// Suite discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscoveryConfig {
    /// Directory to walk for suites.
    pub root: Option<PathBuf>,

    /// Accepted file extensions without the leading dot. Empty accepts any.
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// External engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Command line run once per suite. Supports `{{VAR}}` substitution.
    #[serde(default)]
    pub command: Vec<String>,

    /// Name of the log file written by the engine, inside the log directory.
    #[serde(default = "default_log_file_name", rename = "log-file-name")]
    pub log_file_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            log_file_name: default_log_file_name(),
        }
    }
}

fn default_log_file_name() -> String {
    "{{SUITE}}.xml".to_string()
}

/// Structured log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `type` values on an error marker that mean "incomplete".
    #[serde(default = "default_incomplete_types", rename = "incomplete-types")]
    pub incomplete_types: Vec<String>,

    /// `type` values on an error marker that mean "skipped".
    #[serde(default = "default_skipped_types", rename = "skipped-types")]
    pub skipped_types: Vec<String>,

    /// Keep engine logs in this directory instead of a temporary one.
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            incomplete_types: default_incomplete_types(),
            skipped_types: default_skipped_types(),
            dir: None,
        }
    }
}

fn default_incomplete_types() -> Vec<String> {
    vec![
        "PHPUnit_Framework_IncompleteTestError".to_string(),
        "incomplete".to_string(),
    ]
}

fn default_skipped_types() -> Vec<String> {
    vec![
        "PHPUnit_Framework_SkippedTestError".to_string(),
        "skipped".to_string(),
    ]
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// When to print captured case output.
    #[serde(default, rename = "show-output")]
    pub show_output: ShowOutput,
}

/// Report format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable console report.
    #[default]
    Console,
    /// The aggregate result object as JSON.
    Json,
}

/// Policy for printing captured case output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ShowOutput {
    Always,
    Never,
    /// Only for cases that did not pass.
    #[default]
    OnFailure,
}
