//! Normalized result records produced from a suite's structured log.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::discovery::SuiteId;
use crate::report::{StatusCounts, SuiteVerdict};

/// Outcome classification of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CaseStatus {
    Pass,
    Fail,
    Error,
    Incomplete,
    Skipped,
}

impl CaseStatus {
    /// Every status, in reporting order.
    pub const ALL: [CaseStatus; 5] = [
        CaseStatus::Pass,
        CaseStatus::Fail,
        CaseStatus::Error,
        CaseStatus::Incomplete,
        CaseStatus::Skipped,
    ];

    /// Whether this status keeps a run on the passing side of the verdict.
    pub fn is_acceptable(self) -> bool {
        matches!(
            self,
            CaseStatus::Pass | CaseStatus::Incomplete | CaseStatus::Skipped
        )
    }

    /// Short upper-case marker used by the console formatter.
    pub fn marker(self) -> &'static str {
        match self {
            CaseStatus::Pass => "PASS",
            CaseStatus::Fail => "FAIL",
            CaseStatus::Error => "ERROR",
            CaseStatus::Incomplete => "INCOMPLETE",
            CaseStatus::Skipped => "SKIP",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Result of one executed test case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResult {
    pub name: String,
    pub status: CaseStatus,
    /// Present for every non-passing status, possibly empty.
    pub message: Option<String>,
    pub elapsed_seconds: f64,
    pub assertion_count: u64,
    /// Output captured by the engine, attached after parsing.
    pub captured_output: Option<String>,
}

impl CaseResult {
    /// A passing case with no message.
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CaseStatus::Pass,
            message: None,
            elapsed_seconds: 0.0,
            assertion_count: 0,
            captured_output: None,
        }
    }

    /// A non-passing case carrying a message.
    pub fn with_status(
        name: impl Into<String>,
        status: CaseStatus,
        message: impl Into<String>,
    ) -> Self {
        let message = match status {
            CaseStatus::Pass => None,
            _ => Some(message.into()),
        };
        Self {
            name: name.into(),
            status,
            message,
            elapsed_seconds: 0.0,
            assertion_count: 0,
            captured_output: None,
        }
    }

    /// Elapsed time in milliseconds, rounded to one decimal place.
    pub fn elapsed_millis(&self) -> f64 {
        (self.elapsed_seconds * 10_000.0).round() / 10.0
    }
}

/// Flat `name -> result` map for one executed suite.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteRunOutcome {
    pub suite: SuiteId,
    pub cases: IndexMap<String, CaseResult>,
}

impl SuiteRunOutcome {
    pub fn new(suite: SuiteId, cases: IndexMap<String, CaseResult>) -> Self {
        Self { suite, cases }
    }

    /// Outcome for a suite whose log could not be obtained or parsed:
    /// a single Error case named after the suite.
    pub fn failed(suite: SuiteId, diagnostic: impl Into<String>) -> Self {
        let case = CaseResult::with_status(suite.as_str(), CaseStatus::Error, diagnostic);
        let mut cases = IndexMap::new();
        cases.insert(case.name.clone(), case);
        Self { suite, cases }
    }

    /// Outcome standing in for a suite excluded by the filter.
    pub fn not_run(suite: SuiteId) -> Self {
        Self {
            suite,
            cases: IndexMap::new(),
        }
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for case in self.cases.values() {
            counts.increment(case.status);
        }
        counts
    }

    pub fn verdict(&self) -> SuiteVerdict {
        SuiteVerdict::from_counts(&self.counts())
    }
}
