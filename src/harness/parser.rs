//! JUnit-style XML log parser producing a flat map of case results.
//!
//! Accepted layout:
//!
//! ```text
//! <testsuites>                      (optional container)
//!   <testsuite name="UserTest">     (root suite)
//!     <testcase name="testA" time="0.01" assertions="2"/>
//!     <testcase name="testB"><failure>message</failure></testcase>
//!     <testsuite name="UserTest::testC">   (one nested level, flattened)
//!       <testcase name="testC with data set #0"/>
//!     </testsuite>
//!   </testsuite>
//! </testsuites>
//! ```
//!
//! Sub-suites nested deeper than one level are ignored. When two entries
//! share a name the later one wins.

use std::str::FromStr;

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::model::{CaseResult, CaseStatus};
use crate::config::LogConfig;

const SUITES: &str = "testsuites";
const SUITE: &str = "testsuite";
const CASE: &str = "testcase";
const FAILURE: &str = "failure";
const ERROR: &str = "error";
const SYSTEM_OUT: &str = "system-out";

/// Errors that make a whole log document unusable.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("log document is empty")]
    Empty,

    #[error("unexpected root element <{0}>")]
    UnexpectedRoot(String),

    #[error("more than one root element (second is <{0}>)")]
    MultipleRoots(String),

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("test case without a name attribute")]
    MissingName,
}

/// Parses structured execution logs into [`CaseResult`] maps.
#[derive(Debug, Clone)]
pub struct LogParser {
    incomplete_types: Vec<String>,
    skipped_types: Vec<String>,
}

impl LogParser {
    /// Create a parser using the discriminators from the log configuration.
    pub fn new(config: &LogConfig) -> Self {
        Self {
            incomplete_types: config.incomplete_types.clone(),
            skipped_types: config.skipped_types.clone(),
        }
    }

    /// Parse one suite's log into a flat `name -> result` map.
    pub fn parse(&self, document: &str) -> Result<IndexMap<String, CaseResult>, LogError> {
        let root = Node::read_document(document)?;
        let mut results = IndexMap::new();
        for suite in root_suites(&root)? {
            for case in suite_cases(suite) {
                let result = self.classify(case)?;
                // Last write wins on duplicate names.
                results.insert(result.name.clone(), result);
            }
        }
        Ok(results)
    }

    /// Collect the `system-out` text of every case, keyed by case name.
    pub fn captured_output(&self, document: &str) -> Result<IndexMap<String, String>, LogError> {
        let root = Node::read_document(document)?;
        let mut outputs = IndexMap::new();
        for suite in root_suites(&root)? {
            for case in suite_cases(suite) {
                let name = case.attr("name").ok_or(LogError::MissingName)?;
                if let Some(out) = case.child(SYSTEM_OUT) {
                    outputs.insert(name.to_string(), out.text.clone());
                }
            }
        }
        Ok(outputs)
    }

    fn classify(&self, case: &Node) -> Result<CaseResult, LogError> {
        let name = case.attr("name").ok_or(LogError::MissingName)?;

        let (status, message) = if let Some(failure) = case.child(FAILURE) {
            (CaseStatus::Fail, Some(failure.text.clone()))
        } else if let Some(error) = case.child(ERROR) {
            (self.discriminate(error.attr("type")), Some(error.text.clone()))
        } else {
            (CaseStatus::Pass, None)
        };

        let mut result = CaseResult {
            name: name.to_string(),
            status,
            message,
            elapsed_seconds: 0.0,
            assertion_count: 0,
            captured_output: None,
        };

        let time = numeric_attr::<f64>(case, "time").and_then(|time| {
            if time.is_finite() && time >= 0.0 {
                Ok(time)
            } else {
                Err(format!("invalid time attribute {time:?}"))
            }
        });
        let assertions = numeric_attr::<u64>(case, "assertions");

        let mut problems = Vec::new();
        match time {
            Ok(time) => result.elapsed_seconds = time,
            Err(problem) => problems.push(problem),
        }
        match assertions {
            Ok(count) => result.assertion_count = count,
            Err(problem) => problems.push(problem),
        }

        if !problems.is_empty() {
            let problem = problems.join("; ");
            let message = match result.message.take() {
                Some(original) if !original.is_empty() => format!("{problem}\n{original}"),
                _ => problem,
            };
            result.status = CaseStatus::Error;
            result.message = Some(message);
        }

        Ok(result)
    }

    fn discriminate(&self, kind: Option<&str>) -> CaseStatus {
        match kind {
            Some(kind) if self.incomplete_types.iter().any(|t| t == kind) => {
                CaseStatus::Incomplete
            }
            Some(kind) if self.skipped_types.iter().any(|t| t == kind) => CaseStatus::Skipped,
            _ => CaseStatus::Error,
        }
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new(&LogConfig::default())
    }
}

/// Read a numeric attribute; a missing attribute counts as zero.
fn numeric_attr<T>(node: &Node, key: &str) -> Result<T, String>
where
    T: FromStr + Default,
{
    match node.attr(key) {
        None => Ok(T::default()),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid {key} attribute {raw:?}")),
    }
}

fn root_suites(root: &Node) -> Result<Vec<&Node>, LogError> {
    match root.name.as_str() {
        SUITE => Ok(vec![root]),
        SUITES => Ok(root.children_named(SUITE).collect()),
        other => Err(LogError::UnexpectedRoot(other.to_string())),
    }
}

/// Direct cases of a suite followed by the cases of its direct sub-suites.
fn suite_cases(suite: &Node) -> impl Iterator<Item = &Node> {
    suite.children_named(CASE).chain(
        suite
            .children_named(SUITE)
            .flat_map(|nested| nested.children_named(CASE)),
    )
}

/// Minimal element tree built from the XML event stream.
#[derive(Debug, Default)]
struct Node {
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, LogError> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attrs,
            ..Self::default()
        })
    }

    fn read_document(document: &str) -> Result<Node, LogError> {
        let mut reader = Reader::from_str(document);
        let mut stack: Vec<Node> = Vec::new();
        let mut root: Option<Node> = None;

        loop {
            let finished = match reader.read_event()? {
                Event::Start(start) => {
                    stack.push(Node::from_start(&start)?);
                    None
                }
                Event::Empty(start) => Some(Node::from_start(&start)?),
                Event::End(_) => stack.pop(),
                Event::Text(text) => {
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&text.unescape()?);
                    }
                    None
                }
                Event::CData(data) => {
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                    None
                }
                Event::Eof => break,
                _ => None,
            };

            if let Some(node) = finished {
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None if root.is_some() => return Err(LogError::MultipleRoots(node.name)),
                    None => root = Some(node),
                }
            }
        }

        if let Some(open) = stack.pop() {
            return Err(LogError::Unclosed(open.name));
        }
        root.ok_or(LogError::Empty)
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}
