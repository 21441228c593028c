use crate::core::context::Context;
use crate::core::error::Error;
use crate::discovery::Suite;
use crate::engine::Engine;
use crate::harness::{LogParser, SuiteRunOutcome};

/// Runs one suite through the engine and normalizes its log.
pub struct Dispatcher {
    engine: Box<dyn Engine>,
    parser: LogParser,
}

impl Dispatcher {
    pub fn new(engine: Box<dyn Engine>, parser: LogParser) -> Self {
        Self { engine, parser }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Execute `suite` and build its outcome.
    ///
    /// Never fails: an engine or log failure becomes a single Error case
    /// named after the suite.
    pub fn dispatch(&self, ctx: &Context, suite: &Suite) -> SuiteRunOutcome {
        let output = match self.engine.execute(ctx, suite) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(suite = %suite.id, error = %e, "engine failed");
                return SuiteRunOutcome::failed(suite.id.clone(), e.to_string());
            }
        };

        if output.exit_code != 0 {
            tracing::debug!(suite = %suite.id, exit_code = output.exit_code, "engine exited non-zero");
        }

        let mut cases = match self.parser.parse(&output.log) {
            Ok(cases) => cases,
            Err(e) => {
                tracing::warn!(suite = %suite.id, error = %e, "unreadable suite log");
                return SuiteRunOutcome::failed(suite.id.clone(), Error::from(e).to_string());
            }
        };

        for (name, captured) in output.captured {
            match cases.get_mut(&name) {
                Some(case) => case.captured_output = Some(captured),
                None => {
                    tracing::debug!(suite = %suite.id, case = %name, "dropping output of unknown case");
                }
            }
        }

        SuiteRunOutcome::new(suite.id.clone(), cases)
    }
}
