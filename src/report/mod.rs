//! Run-level statistics, the serializable run report, and incremental
//! run observers.

mod aggregator;

pub use aggregator::Aggregator;

use serde::Serialize;

use crate::core::error::Result;
use crate::discovery::{Suite, SuiteId};
use crate::harness::{CaseResult, CaseStatus, SuiteRunOutcome};

/// One counter per [`CaseStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "Pass")]
    pub pass: usize,
    #[serde(rename = "Fail")]
    pub fail: usize,
    #[serde(rename = "Error")]
    pub error: usize,
    #[serde(rename = "Incomplete")]
    pub incomplete: usize,
    #[serde(rename = "Skipped")]
    pub skipped: usize,
}

impl StatusCounts {
    pub fn get(&self, status: CaseStatus) -> usize {
        match status {
            CaseStatus::Pass => self.pass,
            CaseStatus::Fail => self.fail,
            CaseStatus::Error => self.error,
            CaseStatus::Incomplete => self.incomplete,
            CaseStatus::Skipped => self.skipped,
        }
    }

    pub fn increment(&mut self, status: CaseStatus) {
        match status {
            CaseStatus::Pass => self.pass += 1,
            CaseStatus::Fail => self.fail += 1,
            CaseStatus::Error => self.error += 1,
            CaseStatus::Incomplete => self.incomplete += 1,
            CaseStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.fail + self.error + self.incomplete + self.skipped
    }

    /// Every counted case is Pass, Incomplete or Skipped.
    pub fn is_passing(&self) -> bool {
        self.pass + self.incomplete + self.skipped == self.total()
    }
}

/// Run-level statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    /// Suites seen, run or filtered.
    pub total_classes: usize,
    /// Suites excluded by the filter.
    pub skipped_classes: usize,
    pub status_counts: StatusCounts,
}

impl AggregateSummary {
    /// Number of recorded cases.
    pub fn total(&self) -> usize {
        self.status_counts.total()
    }

    /// The run verdict. An empty run passes.
    pub fn is_passing(&self) -> bool {
        self.status_counts.is_passing()
    }
}

/// Verdict for a single suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuiteVerdict {
    Passed,
    /// At least one Fail case.
    Failed,
    /// Error cases but no Fail.
    Errors,
}

impl SuiteVerdict {
    pub fn from_counts(counts: &StatusCounts) -> Self {
        if counts.fail > 0 {
            SuiteVerdict::Failed
        } else if counts.error > 0 {
            SuiteVerdict::Errors
        } else {
            SuiteVerdict::Passed
        }
    }
}

/// Results of one executed suite as they appear in a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    pub suite_id: SuiteId,
    pub verdict: SuiteVerdict,
    pub cases: Vec<CaseResult>,
}

impl From<SuiteRunOutcome> for SuiteReport {
    fn from(outcome: SuiteRunOutcome) -> Self {
        let verdict = outcome.verdict();
        Self {
            suite_id: outcome.suite,
            verdict,
            cases: outcome.cases.into_values().collect(),
        }
    }
}

/// Everything a renderer needs once the run is over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    #[serde(flatten)]
    pub summary: AggregateSummary,
    pub per_suite: Vec<SuiteReport>,
    pub filtered_out: Vec<SuiteId>,
    pub filter: Option<String>,
}

impl RunReport {
    pub fn is_passing(&self) -> bool {
        self.summary.is_passing()
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Receives run events as they happen. Every method defaults to a no-op.
pub trait RunObserver {
    /// Called once, after discovery and filtering.
    fn on_run_start(&mut self, _included: &[Suite], _filtered_out: &[Suite]) {}

    fn on_suite_filtered(&mut self, _suite: &Suite) {}

    /// Called after each executed suite with the running summary.
    fn on_suite_finished(&mut self, _outcome: &SuiteRunOutcome, _summary: &AggregateSummary) {}

    fn on_run_end(&mut self, _report: &RunReport) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn counts(statuses: &[CaseStatus]) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for status in statuses {
            counts.increment(*status);
        }
        counts
    }

    #[test]
    fn test_verdict_boundary() {
        assert!(counts(&[]).is_passing());
        assert!(
            counts(&[
                CaseStatus::Pass,
                CaseStatus::Incomplete,
                CaseStatus::Skipped
            ])
            .is_passing()
        );
        assert!(!counts(&[CaseStatus::Pass, CaseStatus::Error]).is_passing());
        assert!(!counts(&[CaseStatus::Fail]).is_passing());
    }

    #[test]
    fn test_suite_verdict() {
        assert_eq!(
            SuiteVerdict::from_counts(&counts(&[CaseStatus::Pass, CaseStatus::Skipped])),
            SuiteVerdict::Passed
        );
        assert_eq!(
            SuiteVerdict::from_counts(&counts(&[CaseStatus::Error, CaseStatus::Fail])),
            SuiteVerdict::Failed
        );
        assert_eq!(
            SuiteVerdict::from_counts(&counts(&[CaseStatus::Error, CaseStatus::Pass])),
            SuiteVerdict::Errors
        );
    }

    #[test]
    fn test_report_json_shape() {
        let mut cases = IndexMap::new();
        let case = CaseResult::with_status("testB", CaseStatus::Fail, "expected 1");
        cases.insert(case.name.clone(), case);
        let outcome = SuiteRunOutcome::new(SuiteId::new("models::UserTest"), cases);

        let mut summary = AggregateSummary {
            total_classes: 2,
            skipped_classes: 1,
            ..Default::default()
        };
        summary.status_counts.increment(CaseStatus::Fail);

        let report = RunReport {
            summary,
            per_suite: vec![outcome.into()],
            filtered_out: vec![SuiteId::new("views::HomeTest")],
            filter: Some("models::".to_string()),
        };

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["totalClasses"], 2);
        assert_eq!(value["skippedClasses"], 1);
        assert_eq!(value["statusCounts"]["Fail"], 1);
        assert_eq!(value["statusCounts"]["Pass"], 0);
        assert_eq!(value["perSuite"][0]["suiteId"], "models::UserTest");
        assert_eq!(value["perSuite"][0]["verdict"], "Failed");
        assert_eq!(value["perSuite"][0]["cases"][0]["name"], "testB");
        assert_eq!(value["filteredOut"][0], "views::HomeTest");
        assert_eq!(value["filter"], "models::");
        assert!(!report.is_passing());
    }

    #[test]
    fn test_null_filter_serializes_as_null() {
        let report = RunReport {
            summary: AggregateSummary::default(),
            per_suite: Vec::new(),
            filtered_out: Vec::new(),
            filter: None,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["filter"].is_null());
        assert!(report.is_passing());
    }
}
