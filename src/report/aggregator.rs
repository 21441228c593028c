//! Running status counters folded from per-suite outcomes.

use crate::harness::SuiteRunOutcome;

use super::AggregateSummary;

/// Folds suite outcomes into an [`AggregateSummary`].
///
/// Only counts are kept; case records stay with the outcomes.
#[derive(Debug, Default)]
pub struct Aggregator {
    summary: AggregateSummary,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one suite into the running summary.
    ///
    /// A filtered suite only bumps the class counters; its cases, if any,
    /// are not counted.
    pub fn record(&mut self, outcome: &SuiteRunOutcome, was_filtered: bool) {
        self.summary.total_classes += 1;
        if was_filtered {
            self.summary.skipped_classes += 1;
            return;
        }
        for case in outcome.cases.values() {
            self.summary.status_counts.increment(case.status);
        }
    }

    /// Snapshot of the current counters.
    pub fn summary(&self) -> AggregateSummary {
        self.summary
    }
}
