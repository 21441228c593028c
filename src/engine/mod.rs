//! Engine trait and the command-line implementation for executing suites.

use crate::core::context::Context;
use crate::core::error::Result;
use crate::discovery::Suite;
use indexmap::IndexMap;

mod command;
mod template;

pub use command::CommandEngine;
pub use template::TemplateProcessor;

/// External test-execution engine.
///
/// Runs one suite in isolation and hands back its structured log.
pub trait Engine: Send + Sync {
    /// Execute the suite.
    ///
    /// An `Err` means no usable log was produced. Failing tests are not
    /// errors; they are reported through the log.
    fn execute(&self, ctx: &Context, suite: &Suite) -> Result<EngineOutput>;

    /// Get a human-readable name for this engine.
    fn name(&self) -> &str;
}

/// What an engine produced for one suite.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    /// JUnit-style XML document.
    pub log: String,

    /// Output captured per case name.
    pub captured: IndexMap<String, String>,

    /// Exit code of the engine process, `-1` when killed by a signal.
    pub exit_code: i32,

    pub stderr: String,
}

impl EngineOutput {
    /// Output holding only a log document.
    pub fn from_log(log: impl Into<String>) -> Self {
        Self {
            log: log.into(),
            ..Default::default()
        }
    }

    /// Attach captured output for one case.
    pub fn with_captured(mut self, case: impl Into<String>, output: impl Into<String>) -> Self {
        self.captured.insert(case.into(), output.into());
        self
    }
}
