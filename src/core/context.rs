use crate::config::Config;
use crate::core::error::Result;
use crate::discovery::{ID_SEPARATOR, Suite};
use crate::engine::TemplateProcessor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Context object that carries state through a suite run.
pub struct Context {
    /// Configuration.
    pub config: Config,

    /// Discovery root. Engines run with this as working directory.
    pub root: PathBuf,

    /// Directory engines write their logs into.
    pub log_dir: PathBuf,

    /// Template variables shared by every suite.
    pub template_vars: HashMap<String, String>,

    // Removed on drop when `log.dir` is not configured.
    _temp_log_dir: Option<TempDir>,
}

impl Context {
    /// Create a new context, preparing the log directory.
    pub fn new(config: Config, root: PathBuf) -> Result<Self> {
        let (log_dir, temp_log_dir) = match config.log.dir.clone() {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                (dir, None)
            }
            None => {
                let temp = tempfile::Builder::new().prefix("suite-runner-").tempdir()?;
                (temp.path().to_path_buf(), Some(temp))
            }
        };
        tracing::debug!(log_dir = %log_dir.display(), "prepared log directory");

        let mut ctx = Self {
            config,
            root,
            log_dir,
            template_vars: HashMap::new(),
            _temp_log_dir: temp_log_dir,
        };

        ctx.init_template_vars();

        Ok(ctx)
    }

    /// Initialize template variables.
    ///
    /// Layering order:
    /// 1. Config variables (`[variables]`)
    /// 2. Env var variables (`SUITE_RUNNER_VAR_*`)
    /// 3. Built-in variables (always win)
    fn init_template_vars(&mut self) {
        self.template_vars = self.config.variables.clone();

        for (key, value) in crate::config::env::collect_env_variables() {
            self.template_vars.insert(key, value);
        }

        self.template_vars
            .insert("ROOT".to_string(), self.root.display().to_string());
        self.template_vars
            .insert("LOG_DIR".to_string(), self.log_dir.display().to_string());
    }

    /// Path of the log file the engine writes for `suite`.
    ///
    /// `{{SUITE}}` in `engine.log-file-name` expands to the id with `::`
    /// replaced by `.`, so nested ids stay a single file name.
    pub fn log_file(&self, suite: &Suite) -> PathBuf {
        let mut vars = self.template_vars.clone();
        vars.insert(
            "SUITE".to_string(),
            suite.id.as_str().replace(ID_SEPARATOR, "."),
        );
        let name = TemplateProcessor::process(&self.config.engine.log_file_name, &vars);
        self.log_dir.join(name)
    }

    /// Template variables for one suite: the shared set plus
    /// `SUITE`, `SUITE_PATH` and `LOG_FILE`.
    pub fn suite_vars(&self, suite: &Suite, log_file: &Path) -> HashMap<String, String> {
        let mut vars = self.template_vars.clone();
        vars.insert("SUITE".to_string(), suite.id.to_string());
        vars.insert("SUITE_PATH".to_string(), suite.path.display().to_string());
        vars.insert("LOG_FILE".to_string(), log_file.display().to_string());
        vars
    }
}
