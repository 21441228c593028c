//! Terminal output formatting for suite results.

use std::io::{self, Write};

use crate::config::ShowOutput;
use crate::discovery::Suite;
use crate::report::{AggregateSummary, RunObserver, RunReport, SuiteVerdict};

use super::{CaseResult, CaseStatus, SuiteRunOutcome, decode_label};

/// Formats run events for the terminal as they happen.
pub struct ResultFormatter<W: Write = io::Stdout> {
    out: W,
    show_output: ShowOutput,
}

impl ResultFormatter<io::Stdout> {
    /// Create a formatter printing to stdout with the given output display policy.
    pub fn new(show_output: ShowOutput) -> Self {
        Self::with_writer(io::stdout(), show_output)
    }
}

impl<W: Write> ResultFormatter<W> {
    pub fn with_writer(out: W, show_output: ShowOutput) -> Self {
        Self { out, show_output }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn should_show_output(&self, case: &CaseResult) -> bool {
        match self.show_output {
            ShowOutput::Always => true,
            ShowOutput::Never => false,
            ShowOutput::OnFailure => case.status != CaseStatus::Pass,
        }
    }

    fn write_suite(&mut self, outcome: &SuiteRunOutcome) -> io::Result<()> {
        let verdict = match outcome.verdict() {
            SuiteVerdict::Passed => "ok",
            SuiteVerdict::Failed => "FAILED",
            SuiteVerdict::Errors => "ERRORS",
        };
        let counts = outcome.counts();
        write!(
            self.out,
            "\nsuite {} ... {verdict} ({} total, {} passed, {} failed",
            outcome.suite,
            counts.total(),
            counts.pass,
            counts.fail,
        )?;
        for (count, what) in [
            (counts.error, "errors"),
            (counts.skipped, "skipped"),
            (counts.incomplete, "incomplete"),
        ] {
            if count > 0 {
                write!(self.out, ", {count} {what}")?;
            }
        }
        writeln!(self.out, ")")?;

        for case in outcome.cases.values() {
            self.write_case(case)?;
        }
        Ok(())
    }

    fn write_case(&mut self, case: &CaseResult) -> io::Result<()> {
        let label = decode_label(&case.name);
        let label = if label.is_empty() { &case.name } else { &label };
        writeln!(
            self.out,
            "  [{}] {label} ({} assertions, {:.1} ms)",
            case.status.marker(),
            case.assertion_count,
            case.elapsed_millis(),
        )?;

        if let Some(message) = case.message.as_deref().filter(|m| !m.is_empty()) {
            for line in message.lines() {
                writeln!(self.out, "      {line}")?;
            }
        }

        if let Some(output) = case.captured_output.as_deref().filter(|o| !o.is_empty()) {
            if self.should_show_output(case) {
                writeln!(self.out, "    --- captured output ---")?;
                write!(self.out, "{output}")?;
                if !output.ends_with('\n') {
                    writeln!(self.out)?;
                }
                writeln!(self.out, "    --- end output ---")?;
            }
        }
        Ok(())
    }

    fn write_summary(&mut self, report: &RunReport) -> io::Result<()> {
        if !report.filtered_out.is_empty() {
            writeln!(
                self.out,
                "\nfiltered out ({}):",
                report.filtered_out.len()
            )?;
            for id in &report.filtered_out {
                writeln!(self.out, "  {id}")?;
            }
        }

        let summary = &report.summary;
        let counts = &summary.status_counts;
        let status = if summary.is_passing() { "ok" } else { "FAILED" };
        writeln!(
            self.out,
            "\ntest result: {status}. {} passed, {} failed, {} errors, {} incomplete, {} skipped; {} suites ({} filtered out)",
            counts.pass,
            counts.fail,
            counts.error,
            counts.incomplete,
            counts.skipped,
            summary.total_classes,
            summary.skipped_classes,
        )?;
        self.out.flush()
    }

    fn warn_on_error(result: io::Result<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write report");
        }
    }
}

impl<W: Write> RunObserver for ResultFormatter<W> {
    fn on_run_start(&mut self, included: &[Suite], filtered_out: &[Suite]) {
        let result = writeln!(
            self.out,
            "running {} suites ({} filtered out)",
            included.len(),
            filtered_out.len()
        );
        Self::warn_on_error(result);
    }

    fn on_suite_finished(&mut self, outcome: &SuiteRunOutcome, _summary: &AggregateSummary) {
        let result = self.write_suite(outcome);
        Self::warn_on_error(result);
    }

    fn on_run_end(&mut self, report: &RunReport) {
        let result = self.write_summary(report);
        Self::warn_on_error(result);
    }
}
