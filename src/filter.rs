//! Prefix filter partitioning suites into run and filtered-out sets.

use crate::discovery::{Suite, SuiteId};

/// Optional identifier prefix. An unset or empty prefix includes every suite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    prefix: Option<String>,
}

impl FilterPredicate {
    pub fn new(prefix: Option<impl Into<String>>) -> Self {
        Self {
            prefix: prefix.map(Into::into).filter(|p: &String| !p.is_empty()),
        }
    }

    /// A predicate that includes every suite.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn includes(&self, id: &SuiteId) -> bool {
        match &self.prefix {
            Some(prefix) => id.as_str().starts_with(prefix.as_str()),
            None => true,
        }
    }

    /// Split suites into `(included, filtered_out)`, preserving order.
    pub fn partition(&self, suites: Vec<Suite>) -> (Vec<Suite>, Vec<Suite>) {
        suites.into_iter().partition(|suite| self.includes(&suite.id))
    }
}
