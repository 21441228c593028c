use std::path::PathBuf;

use crate::harness::LogError;

/// Result type alias for suite-runner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for suite-runner.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The discovery root is missing or is not a directory.
    #[error("Cannot discover suites under {}: {reason}", .path.display())]
    DiscoveryRoot { path: PathBuf, reason: String },

    /// The engine did not produce a usable log for a suite.
    #[error("Engine error: {0}")]
    Engine(String),

    /// The structured log of a suite could not be parsed.
    #[error("Log error: {0}")]
    Log(#[from] LogError),

    /// File not found.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Missing required configuration field.
    #[error("Missing required configuration field: {0}")]
    MissingConfig(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidConfig { field: String, value: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an engine error.
    pub fn engine(msg: impl Into<String>) -> Self {
        Error::Engine(msg.into())
    }

    /// Create a discovery root error.
    pub fn discovery_root(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::DiscoveryRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        assert_eq!(
            Error::config("bad value").to_string(),
            "Configuration error: bad value"
        );
        assert_eq!(
            Error::engine("no log written").to_string(),
            "Engine error: no log written"
        );
        assert_eq!(
            Error::discovery_root("/missing", "not a directory").to_string(),
            "Cannot discover suites under /missing: not a directory"
        );
    }

    #[test]
    fn test_error_file_not_found() {
        let err = Error::FileNotFound(PathBuf::from("/missing/suite-runner.toml"));
        assert_eq!(err.to_string(), "File not found: /missing/suite-runner.toml");
    }

    #[test]
    fn test_error_missing_config() {
        let err = Error::MissingConfig("engine.command".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required configuration field: engine.command"
        );
    }

    #[test]
    fn test_error_invalid_config() {
        let err = Error::InvalidConfig {
            field: "output.format".to_string(),
            value: "html".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for output.format: html"
        );
    }

    #[test]
    fn test_error_from_log_error() {
        let err: Error = LogError::Empty.into();
        assert_eq!(err.to_string(), "Log error: log document is empty");
    }
}
