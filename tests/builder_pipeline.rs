use suite_runner::config::Config;
use suite_runner::core::{Context, Result};
use suite_runner::discovery::Suite;
use suite_runner::engine::{Engine, EngineOutput};
use suite_runner::harness::CaseStatus;
use suite_runner::report::SuiteVerdict;
use suite_runner::{Error, SuiteRunnerBuilder};

/// Engine that answers from a fixed table of suite id to log document.
struct TableEngine(Vec<(&'static str, &'static str)>);

impl Engine for TableEngine {
    fn execute(&self, _ctx: &Context, suite: &Suite) -> Result<EngineOutput> {
        match self.0.iter().find(|(id, _)| *id == suite.id.as_str()) {
            Some((_, log)) => Ok(EngineOutput::from_log(*log).with_captured("testA", "printed by A")),
            None => Err(Error::engine(format!("no log for {}", suite.id))),
        }
    }

    fn name(&self) -> &str {
        "table"
    }
}

const KNOWN_GOOD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="StringTest" tests="3">
    <testcase name="testA" time="0.5" assertions="3"/>
    <testcase name="testB" time="0.25" assertions="1">
      <failure type="AssertionFailed">expected 1, got 2</failure>
    </testcase>
    <testcase name="testC" time="0" assertions="0">
      <error type="incomplete">not finished</error>
    </testcase>
  </testsuite>
</testsuites>"#;

const NESTED: &str = r#"<testsuite name="ArrayTest">
  <testcase name="testA" assertions="1"/>
  <testsuite name="ArrayTest::testB">
    <testcase name="testB with data set #1"/>
    <testcase name="testB with data set #2"/>
  </testsuite>
</testsuite>"#;

fn tree(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for rel in files {
        let path = dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }
    dir
}

#[test]
fn test_pipeline_classifies_and_aggregates() {
    let dir = tree(&["StringTest.sh", "ArrayTest.sh", "BrokenTest.sh"]);
    let engine = TableEngine(vec![("StringTest", KNOWN_GOOD), ("ArrayTest", NESTED)]);

    let report = SuiteRunnerBuilder::new()
        .root(dir.path())
        .engine(engine)
        .run()
        .unwrap();

    // Discovery order: ArrayTest, BrokenTest, StringTest
    let ids: Vec<&str> = report.per_suite.iter().map(|s| s.suite_id.as_str()).collect();
    assert_eq!(ids, vec!["ArrayTest", "BrokenTest", "StringTest"]);

    let array = &report.per_suite[0];
    let names: Vec<&str> = array.cases.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["testA", "testB with data set #1", "testB with data set #2"]
    );
    assert_eq!(array.verdict, SuiteVerdict::Passed);
    assert_eq!(array.cases[0].captured_output.as_deref(), Some("printed by A"));

    let broken = &report.per_suite[1];
    assert_eq!(broken.verdict, SuiteVerdict::Errors);
    assert_eq!(broken.cases.len(), 1);
    assert_eq!(broken.cases[0].name, "BrokenTest");
    assert!(broken.cases[0].message.as_deref().unwrap().contains("no log for BrokenTest"));

    let string = &report.per_suite[2];
    let statuses: Vec<CaseStatus> = string.cases.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![CaseStatus::Pass, CaseStatus::Fail, CaseStatus::Incomplete]
    );
    assert_eq!(string.cases[0].elapsed_seconds, 0.5);
    assert_eq!(string.cases[0].assertion_count, 3);
    assert_eq!(string.cases[1].message.as_deref(), Some("expected 1, got 2"));
    assert_eq!(string.verdict, SuiteVerdict::Failed);

    let counts = report.summary.status_counts;
    assert_eq!(report.summary.total_classes, 3);
    assert_eq!(report.summary.skipped_classes, 0);
    assert_eq!(counts.pass, 4);
    assert_eq!(counts.fail, 1);
    assert_eq!(counts.error, 1);
    assert_eq!(counts.incomplete, 1);
    assert_eq!(report.summary.total(), 7);
    assert!(!report.is_passing());
}

#[test]
fn test_every_suite_failing_still_produces_a_report() {
    let dir = tree(&["ATest.sh", "BTest.sh"]);
    let report = SuiteRunnerBuilder::new()
        .root(dir.path())
        .engine(TableEngine(Vec::new()))
        .run()
        .unwrap();
    assert_eq!(report.summary.status_counts.error, 2);
    assert_eq!(report.summary.total(), 2);
    assert!(!report.is_passing());
}

#[test]
fn test_empty_root_passes() {
    let dir = tree(&[]);
    let report = SuiteRunnerBuilder::new()
        .root(dir.path())
        .engine(TableEngine(Vec::new()))
        .run()
        .unwrap();
    assert_eq!(report.summary.total_classes, 0);
    assert!(report.is_passing());
}

#[test]
fn test_filter_excludes_everything() {
    let dir = tree(&["StringTest.sh"]);
    let report = SuiteRunnerBuilder::new()
        .root(dir.path())
        .filter("Nothing")
        .engine(TableEngine(vec![("StringTest", KNOWN_GOOD)]))
        .run()
        .unwrap();
    assert!(report.per_suite.is_empty());
    assert_eq!(report.summary.total_classes, 1);
    assert_eq!(report.summary.skipped_classes, 1);
    assert_eq!(report.filtered_out[0].as_str(), "StringTest");
    assert!(report.is_passing());
}

#[cfg(unix)]
#[test]
fn test_command_engine_end_to_end() {
    let dir = tree(&["models/UserTest.sh"]);
    let suite = dir.path().join("models/UserTest.sh");
    std::fs::write(
        &suite,
        r#"cat > "$1" <<'EOF'
<testsuite name="UserTest">
  <testcase name="testCreates_user" assertions="2" time="0.001"><system-out>created</system-out></testcase>
  <testcase name="testSkips"><error type="skipped">later</error></testcase>
</testsuite>
EOF
exit 1
"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.engine.command = vec![
        "sh".to_string(),
        "{{SUITE_PATH}}".to_string(),
        "{{LOG_FILE}}".to_string(),
    ];
    config.log.dir = Some(dir.path().join("logs"));

    let report = SuiteRunnerBuilder::new()
        .with_config(config)
        .root(dir.path())
        .run()
        .unwrap();

    assert_eq!(report.per_suite.len(), 1);
    let user = &report.per_suite[0];
    assert_eq!(user.suite_id.as_str(), "models::UserTest");
    assert_eq!(user.cases[0].status, CaseStatus::Pass);
    assert_eq!(user.cases[0].captured_output.as_deref(), Some("created"));
    assert_eq!(user.cases[1].status, CaseStatus::Skipped);
    assert!(report.is_passing());
    assert!(dir.path().join("logs/models.UserTest.xml").is_file());
}
