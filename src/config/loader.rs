use super::Config;
use crate::core::error::{Error, Result};
use std::path::{Path, PathBuf};

/// File looked up in the suite root when no explicit config file is given.
pub const CONFIG_FILE_NAME: &str = "suite-runner.toml";

/// Configuration loader that supports multiple sources.
pub struct ConfigLoader {
    /// Directory searched for `suite-runner.toml`.
    root: Option<PathBuf>,
    /// Path to standalone config file.
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self {
            root: None,
            config_file: None,
        }
    }

    /// Set the directory searched for `suite-runner.toml`.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set a standalone configuration file path.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Load configuration from all enabled sources.
    ///
    /// Priority (later sources override earlier):
    /// 1. Default values
    /// 2. Standalone TOML file (explicit, or `suite-runner.toml` in the root)
    /// 3. Profile overlay (`SUITE_RUNNER_PROFILE`)
    /// 4. Individual env var overrides (`SUITE_RUNNER_*`)
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn load(self) -> Result<Config> {
        let mut config = Config::default();

        if let Some(path) = self.config_path()? {
            config = Config::from_toml_file(&path)?;
            if let Some(base) = path.parent() {
                resolve_relative_paths(&mut config, base);
            }
            tracing::debug!(path = %path.display(), "loaded configuration file");
        }

        if let Some(profile_name) = super::env::get_profile_name() {
            config = apply_profile(config, &profile_name)?;
        }

        // Apply individual env var overrides (highest priority)
        super::env::apply_env_overrides(&mut config);

        Ok(config)
    }

    fn config_path(&self) -> Result<Option<PathBuf>> {
        if let Some(ref explicit) = self.config_file {
            if !explicit.is_file() {
                return Err(Error::FileNotFound(explicit.clone()));
            }
            return Ok(Some(explicit.clone()));
        }

        Ok(self
            .root
            .as_ref()
            .map(|root| root.join(CONFIG_FILE_NAME))
            .filter(|candidate| candidate.is_file()))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlay the named profile onto `config`.
fn apply_profile(config: Config, profile_name: &str) -> Result<Config> {
    let profile_value = config.profiles.get(profile_name).cloned().ok_or_else(|| {
        let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        if available.is_empty() {
            Error::config(format!(
                "profile '{}' not found (no profiles defined)",
                profile_name,
            ))
        } else {
            Error::config(format!(
                "profile '{}' not found. Available profiles: {}",
                profile_name,
                available.join(", "),
            ))
        }
    })?;

    let mut base_value = serde_json::to_value(&config)
        .map_err(|e| Error::config(format!("failed to serialize config: {}", e)))?;
    deep_merge(&mut base_value, &profile_value);
    let mut merged: Config = serde_json::from_value(base_value).map_err(|e| {
        Error::config(format!("failed to apply profile '{}': {}", profile_name, e))
    })?;
    merged.profiles = config.profiles;
    Ok(merged)
}

fn resolve_relative_paths(config: &mut Config, base: &Path) {
    if let Some(root) = config.discovery.root.as_mut() {
        if root.is_relative() {
            *root = base.join(&*root);
        }
    }
    if let Some(dir) = config.log.dir.as_mut() {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }
}

/// Recursively deep-merge `overlay` into `base`.
///
/// - Objects: keys are merged recursively (overlay keys win for conflicts).
/// - Scalars and arrays: overlay replaces base entirely.
pub(crate) fn deep_merge(base: &mut serde_json::Value, overlay: &serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let entry = base_map
                    .entry(key.clone())
                    .or_insert(serde_json::Value::Null);
                deep_merge(entry, overlay_val);
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}
