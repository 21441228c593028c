use std::path::PathBuf;

use suite_runner::config::{CONFIG_FILE_NAME, ConfigLoader, OutputFormat, ShowOutput};

#[test]
fn test_full_config_parsing() {
    let toml_str = r#"
filter = "models::"
verbose = true

[discovery]
root = "tests"
extensions = ["sh"]

[engine]
command = ["run-suite", "--junit", "{{LOG_FILE}}", "{{SUITE_PATH}}"]
log-file-name = "{{SUITE}}.junit.xml"

[log]
incomplete-types = ["incomplete", "pending"]
skipped-types = ["skipped"]
dir = "target/suite-logs"

[output]
format = "json"
show-output = "never"

[variables]
BOOTSTRAP = "tests/bootstrap.sh"
"#;
    let config: suite_runner::Config = toml::from_str(toml_str).unwrap();

    assert_eq!(config.filter_prefix(), Some("models::"));
    assert!(config.verbose);
    assert_eq!(config.discovery.root, Some(PathBuf::from("tests")));
    assert_eq!(config.discovery.extensions, vec!["sh"]);
    assert_eq!(config.engine.command[0], "run-suite");
    assert_eq!(config.engine.log_file_name, "{{SUITE}}.junit.xml");
    assert_eq!(config.log.incomplete_types, vec!["incomplete", "pending"]);
    assert_eq!(config.log.dir, Some(PathBuf::from("target/suite-logs")));
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.output.show_output, ShowOutput::Never);
    assert_eq!(
        config.variables.get("BOOTSTRAP").unwrap(),
        "tests/bootstrap.sh"
    );
}

#[test]
fn test_loader_finds_config_in_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[engine]\ncommand = [\"run-suite\"]\n\n[discovery]\nroot = \"suites\"\n",
    )
    .unwrap();

    let config = ConfigLoader::new().root(dir.path()).load().unwrap();
    assert_eq!(config.engine.command, vec!["run-suite"]);
    assert_eq!(config.discovery.root, Some(dir.path().join("suites")));
}

#[test]
fn test_loader_explicit_file_elsewhere() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ci.toml");
    std::fs::write(&path, "[output]\nshow-output = \"always\"\n").unwrap();

    let config = ConfigLoader::new()
        .root("/nonexistent")
        .config_file(&path)
        .load()
        .unwrap();
    assert_eq!(config.output.show_output, ShowOutput::Always);
}

#[test]
fn test_config_round_trips_through_toml() {
    let config: suite_runner::Config =
        toml::from_str("filter = \"Db\"\n[engine]\ncommand = [\"x\"]\n").unwrap();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let reparsed: suite_runner::Config = toml::from_str(&rendered).unwrap();
    assert_eq!(reparsed.filter_prefix(), Some("Db"));
    assert_eq!(reparsed.engine.command, vec!["x"]);
}
