use super::{Engine, EngineOutput, TemplateProcessor};
use crate::config::Config;
use crate::core::context::Context;
use crate::core::error::{Error, Result};
use crate::discovery::Suite;
use crate::harness::LogParser;
use std::process::{Command, Stdio};

/// Engine that spawns a configured command line once per suite.
///
/// The command must write a JUnit-style XML log to `{{LOG_FILE}}`.
pub struct CommandEngine {
    command: Vec<String>,
    parser: LogParser,
}

impl CommandEngine {
    /// Create an engine from `engine.command`.
    pub fn new(config: &Config) -> Result<Self> {
        if config.engine.command.is_empty() {
            return Err(Error::MissingConfig("engine.command".to_string()));
        }
        Ok(Self {
            command: config.engine.command.clone(),
            parser: LogParser::new(&config.log),
        })
    }

    fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }
}

impl Engine for CommandEngine {
    fn execute(&self, ctx: &Context, suite: &Suite) -> Result<EngineOutput> {
        let log_file = ctx.log_file(suite);
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // A log left over from an earlier run must not be mistaken for this one.
        match std::fs::remove_file(&log_file) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let vars = ctx.suite_vars(suite, &log_file);
        let args: Vec<String> = self
            .command
            .iter()
            .map(|arg| TemplateProcessor::process(arg, &vars))
            .collect();
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| Error::MissingConfig("engine.command".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(rest)
            .current_dir(&ctx.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(suite = %suite.id, command = ?cmd, "executing engine");

        let output = cmd
            .output()
            .map_err(|e| Error::engine(format!("failed to execute {}: {}", program, e)))?;

        let exit_code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        let log = match std::fs::read_to_string(&log_file) {
            Ok(log) if !log.trim().is_empty() => log,
            Ok(_) => {
                return Err(Error::engine(format!(
                    "{} wrote an empty log {} (exit code {}){}",
                    program,
                    log_file.display(),
                    exit_code,
                    stderr_suffix(&stderr),
                )));
            }
            Err(e) => {
                return Err(Error::engine(format!(
                    "{} produced no log at {}: {} (exit code {}){}",
                    program,
                    log_file.display(),
                    e,
                    exit_code,
                    stderr_suffix(&stderr),
                )));
            }
        };

        let captured = match self.parser.captured_output(&log) {
            Ok(captured) => captured,
            Err(e) => {
                tracing::debug!(suite = %suite.id, error = %e, "no captured output extracted");
                Default::default()
            }
        };

        Ok(EngineOutput {
            log,
            captured,
            exit_code,
            stderr,
        })
    }

    fn name(&self) -> &str {
        self.program()
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}
