//! suite-runner: discover test suites, run each one through an external engine,
//! and aggregate the JUnit-style results.
//!
//! A suite is any file named `<identifier>Test.<ext>` under a root directory.
//! Every suite is executed in isolation by an [`Engine`](engine::Engine), whose
//! XML log is parsed into typed [`CaseResult`](harness::CaseResult) records and
//! folded into a run-level [`AggregateSummary`](report::AggregateSummary).
//!
//! # Quick Start
//!
//! ## Using the Builder API
//!
//! ```no_run
//! use suite_runner::builder;
//!
//! # fn main() -> suite_runner::Result<()> {
//! let report = builder()
//!     .from_config_file("suite-runner.toml")?
//!     .root("tests")
//!     .filter("models::")
//!     .run()?;
//!
//! println!("{} cases, passing: {}", report.summary.total(), report.is_passing());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration in suite-runner.toml
//!
//! ```toml
//! [discovery]
//! root = "tests"
//! extensions = ["sh"]
//!
//! [engine]
//! command = ["run-suite", "--junit", "{{LOG_FILE}}", "{{SUITE_PATH}}"]
//!
//! [log]
//! skipped-types = ["skipped", "ignored"]
//!
//! [output]
//! show-output = "on-failure"
//! ```
//!
//! # Architecture
//!
//! `discovery → filter → engine → harness → report`
//!
//! - [`SuiteDiscoverer`](discovery::SuiteDiscoverer): walks the root for suite files
//! - [`FilterPredicate`](filter::FilterPredicate): splits suites by identifier prefix
//! - [`Engine`](engine::Engine): executes one suite and returns its log
//! - [`LogParser`](harness::LogParser): turns a log into case results
//! - [`Aggregator`](report::Aggregator): folds results into run statistics
//!
//! # Custom Engine Example
//!
//! ```no_run
//! use suite_runner::core::{Context, Result};
//! use suite_runner::discovery::Suite;
//! use suite_runner::engine::{Engine, EngineOutput};
//!
//! struct AlwaysGreen;
//!
//! impl Engine for AlwaysGreen {
//!     fn execute(&self, _ctx: &Context, suite: &Suite) -> Result<EngineOutput> {
//!         Ok(EngineOutput::from_log(format!(
//!             r#"<testsuite name="{}"><testcase name="testOk"/></testsuite>"#,
//!             suite.id
//!         )))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "always-green"
//!     }
//! }
//!
//! # fn main() -> suite_runner::Result<()> {
//! let report = suite_runner::builder().root("tests").engine(AlwaysGreen).run()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `default` - Enables `cli`
//! - `cli` - The `suite-runner` binary (clap, tracing-subscriber)

pub mod config;
pub mod core;
pub mod discovery;
pub mod engine;
pub mod filter;
pub mod harness;
pub mod report;

// Re-export commonly used types
pub use crate::core::{Error, Result, SuiteRunner, SuiteRunnerBuilder};
pub use config::Config;
pub use report::RunReport;

/// Create a new suite runner builder.
///
/// This is the main entry point for the fluent API.
///
/// # Example
///
/// ```no_run
/// use suite_runner::builder;
///
/// # fn main() -> suite_runner::Result<()> {
/// let report = builder().root("tests").run()?;
/// assert!(report.is_passing());
/// # Ok(())
/// # }
/// ```
pub fn builder() -> SuiteRunnerBuilder {
    SuiteRunnerBuilder::new()
}
