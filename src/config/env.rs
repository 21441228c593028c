//! Environment variable processing for runtime configuration overrides.
//!
//! Env var prefix: `SUITE_RUNNER_`
//!
//! - `SUITE_RUNNER_PROFILE`: select a configuration profile
//! - `SUITE_RUNNER_VAR_<NAME>`: set template variable `<NAME>`
//! - `SUITE_RUNNER_FILTER`: suite identifier prefix filter
//! - `SUITE_RUNNER_ENGINE`: engine command line (whitespace-split)
//! - `SUITE_RUNNER_ROOT`: discovery root directory
//! - `SUITE_RUNNER_LOG_DIR`: keep engine logs in this directory
//! - `SUITE_RUNNER_FORMAT`: report format (console/json)
//! - `SUITE_RUNNER_VERBOSE`: enable verbose output (1/true/yes)

use super::{Config, OutputFormat};
use std::collections::HashMap;
use std::path::PathBuf;

const PREFIX: &str = "SUITE_RUNNER_";
const VAR_PREFIX: &str = "SUITE_RUNNER_VAR_";

/// Read the active profile name from `SUITE_RUNNER_PROFILE`.
pub fn get_profile_name() -> Option<String> {
    env_str("PROFILE")
}

/// Collect template variables from `SUITE_RUNNER_VAR_*` env vars.
///
/// The `VAR_` prefix is stripped, so `SUITE_RUNNER_VAR_BOOTSTRAP=x`
/// produces `("BOOTSTRAP", "x")`.
pub fn collect_env_variables() -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for (key, value) in std::env::vars() {
        if let Some(name) = key.strip_prefix(VAR_PREFIX) {
            if !name.is_empty() {
                vars.insert(name.to_string(), value);
            }
        }
    }
    vars
}

/// Apply individual env var overrides to a config.
///
/// Each override is applied only if the env var is set and parses correctly.
/// Invalid values are silently ignored.
pub fn apply_env_overrides(config: &mut Config) {
    if let Some(val) = env_str("FILTER") {
        config.filter = Some(val);
    }

    if let Some(val) = env_str("ENGINE") {
        let command: Vec<String> = val.split_whitespace().map(String::from).collect();
        if !command.is_empty() {
            config.engine.command = command;
        }
    }

    if let Some(val) = env_str("ROOT") {
        config.discovery.root = Some(PathBuf::from(val));
    }

    if let Some(val) = env_str("LOG_DIR") {
        config.log.dir = Some(PathBuf::from(val));
    }

    if let Some(val) = env_str("FORMAT") {
        match val.to_lowercase().as_str() {
            "console" => config.output.format = OutputFormat::Console,
            "json" => config.output.format = OutputFormat::Json,
            _ => {} // invalid value, ignore
        }
    }

    if let Some(val) = env_bool("VERBOSE") {
        config.verbose = val;
    }
}

/// Summarize which env var overrides are currently active.
///
/// Returns a list of `(env_var_name, value)` pairs for display in `check`.
pub fn detect_active_overrides() -> Vec<(String, String)> {
    let keys = [
        "PROFILE", "FILTER", "ENGINE", "ROOT", "LOG_DIR", "FORMAT", "VERBOSE",
    ];

    let mut active = Vec::new();
    for key in keys {
        let full = format!("{PREFIX}{key}");
        if let Ok(val) = std::env::var(&full) {
            if !val.is_empty() {
                active.push((full, val));
            }
        }
    }
    active
}

// --- helpers ---

fn env_str(suffix: &str) -> Option<String> {
    std::env::var(format!("{PREFIX}{suffix}"))
        .ok()
        .filter(|s| !s.is_empty())
}

fn env_bool(suffix: &str) -> Option<bool> {
    env_str(suffix).map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Serializes tests that touch process-global env vars.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Run a closure with specific env vars set (`Some`) or removed (`None`),
/// restoring the previous values afterwards.
#[cfg(test)]
pub(crate) fn with_env_vars<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut old: Vec<(&str, Option<String>)> = Vec::new();
    for &(k, v) in vars {
        old.push((k, std::env::var(k).ok()));
        // SAFETY: tests are serialized via ENV_LOCK
        match v {
            Some(v) => unsafe { std::env::set_var(k, v) },
            None => unsafe { std::env::remove_var(k) },
        }
    }
    f();
    for (k, prev) in old {
        // SAFETY: tests are serialized via ENV_LOCK
        match prev {
            Some(v) => unsafe { std::env::set_var(k, v) },
            None => unsafe { std::env::remove_var(k) },
        }
    }
}
