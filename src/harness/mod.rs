//! Result interpretation for executed suites.
//!
//! The harness sits after the engine in the pipeline: `Discovery → Filter → Engine → Harness → Report`.
//! The engine produces a JUnit-style XML log; the harness turns it into typed
//! [`CaseResult`] records and renders them for humans.

mod formatter;
mod label;
mod model;
mod parser;

pub use formatter::ResultFormatter;
pub use label::decode_label;
pub use model::{CaseResult, CaseStatus, SuiteRunOutcome};
pub use parser::{LogError, LogParser};
