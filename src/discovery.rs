//! Suite discovery: walks a directory tree for `<identifier>Test<extension>` files.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::DiscoveryConfig;
use crate::core::error::{Error, Result};

/// Collection every discovered suite is grouped under.
pub const DEFAULT_COLLECTION: &str = "default";

/// Separator between directory components and the file stem in a [`SuiteId`].
pub const ID_SEPARATOR: &str = "::";

static SUITE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*Test\.([^.]+)$").expect("suite file pattern is valid")
});

/// Identifier of a discoverable suite, e.g. `models::UserTest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SuiteId(String);

impl SuiteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SuiteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A discovered suite and the file the engine executes for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    pub id: SuiteId,
    pub path: PathBuf,
}

impl Suite {
    pub fn new(id: SuiteId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// Build a suite for a single file, identified by its file stem.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::config(format!("invalid suite path: {}", path.display())))?;
        if !path.is_file() {
            return Err(Error::FileNotFound(path));
        }
        Ok(Self::new(SuiteId::new(stem), path))
    }
}

/// Discovered suites grouped by collection name, sorted and deduplicated by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    collections: BTreeMap<String, BTreeMap<SuiteId, PathBuf>>,
}

impl Discovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a suite. Returns `false` when the id was already present;
    /// the first path registered for an id is kept.
    pub fn insert(&mut self, collection: &str, suite: Suite) -> bool {
        let suites = self.collections.entry(collection.to_string()).or_default();
        if suites.contains_key(&suite.id) {
            tracing::debug!(suite = %suite.id, path = %suite.path.display(), "duplicate suite id ignored");
            return false;
        }
        suites.insert(suite.id, suite.path);
        true
    }

    /// Collection names, sorted.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Suites of one collection, sorted by id.
    pub fn collection(&self, name: &str) -> Vec<Suite> {
        self.collections
            .get(name)
            .map(|suites| {
                suites
                    .iter()
                    .map(|(id, path)| Suite::new(id.clone(), path))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every suite, collection by collection, each sorted by id.
    pub fn suites(&self) -> Vec<Suite> {
        self.collection_names()
            .flat_map(|name| self.collection(name))
            .collect()
    }

    pub fn ids(&self) -> Vec<SuiteId> {
        self.suites().into_iter().map(|s| s.id).collect()
    }

    pub fn len(&self) -> usize {
        self.collections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walks directory trees for suite files.
#[derive(Debug, Clone, Default)]
pub struct SuiteDiscoverer {
    extensions: Vec<String>,
}

impl SuiteDiscoverer {
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    /// Discover every suite under `root`.
    ///
    /// Fails only when `root` itself cannot be walked. Unreadable
    /// subdirectories are skipped.
    pub fn discover(&self, root: &Path) -> Result<Discovery> {
        let mut discovery = Discovery::new();
        self.discover_into(root, &mut discovery)?;
        Ok(discovery)
    }

    /// Discover suites under `root` into an existing [`Discovery`].
    pub fn discover_into(&self, root: &Path, discovery: &mut Discovery) -> Result<()> {
        if !root.exists() {
            return Err(Error::discovery_root(root, "does not exist"));
        }
        if !root.is_dir() {
            return Err(Error::discovery_root(root, "not a directory"));
        }
        let entries = std::fs::read_dir(root)
            .map_err(|e| Error::discovery_root(root, e.to_string()))?;

        let mut prefix = Vec::new();
        self.walk_entries(entries, root, &mut prefix, discovery);
        Ok(())
    }

    /// Whether a file name follows the `<identifier>Test<extension>` rule.
    pub fn is_suite_file(&self, file_name: &str) -> bool {
        match SUITE_FILE.captures(file_name) {
            Some(caps) => {
                self.extensions.is_empty() || self.extensions.iter().any(|ext| *ext == caps[1])
            }
            None => false,
        }
    }

    fn walk(&self, dir: &Path, prefix: &mut Vec<String>, discovery: &mut Discovery) {
        match std::fs::read_dir(dir) {
            Ok(entries) => self.walk_entries(entries, dir, prefix, discovery),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            }
        }
    }

    // `read_dir` never yields `.` or `..`. Symlinked directories are not followed.
    fn walk_entries(
        &self,
        entries: std::fs::ReadDir,
        dir: &Path,
        prefix: &mut Vec<String>,
        discovery: &mut Discovery,
    ) {
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            if file_type.is_dir() {
                prefix.push(name);
                self.walk(&path, prefix, discovery);
                prefix.pop();
            } else if self.is_suite_file(&name) {
                let stem = match name.rfind('.') {
                    Some(dot) => &name[..dot],
                    None => name.as_str(),
                };
                let id = prefix
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(stem))
                    .collect::<Vec<_>>()
                    .join(ID_SEPARATOR);
                tracing::debug!(suite = %id, dir = %dir.display(), "discovered suite");
                discovery.insert(DEFAULT_COLLECTION, Suite::new(SuiteId::new(id), path));
            }
        }
    }
}

/// Discover suites under `root` with default settings.
pub fn discover(root: impl AsRef<Path>) -> Result<Discovery> {
    SuiteDiscoverer::default().discover(root.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"").unwrap();
    }

    fn sample_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "StringTest.sh");
        touch(dir.path(), "ArrayTest.py");
        touch(dir.path(), "helpers.sh");
        touch(dir.path(), "Test.sh");
        touch(dir.path(), "9LivesTest.sh");
        touch(dir.path(), "models/UserTest.sh");
        touch(dir.path(), "models/deep/_PrivateTest.sh");
        touch(dir.path(), "models/README.md");
        std::fs::create_dir_all(dir.path().join("empty")).unwrap();
        dir
    }

    #[test]
    fn test_file_name_rule() {
        let d = SuiteDiscoverer::default();
        assert!(d.is_suite_file("StringTest.sh"));
        assert!(d.is_suite_file("_x9Test.rb"));
        assert!(!d.is_suite_file("Test.sh"));
        assert!(!d.is_suite_file("9LivesTest.sh"));
        assert!(!d.is_suite_file("StringTest"));
        assert!(!d.is_suite_file("StringTests.sh"));
        assert!(!d.is_suite_file("String-Test.sh"));
        assert!(!d.is_suite_file("StringTest.sh.bak"));
    }

    #[test]
    fn test_extension_filter() {
        let config = DiscoveryConfig {
            extensions: vec![".sh".to_string()],
            ..Default::default()
        };
        let d = SuiteDiscoverer::new(&config);
        assert!(d.is_suite_file("StringTest.sh"));
        assert!(!d.is_suite_file("StringTest.py"));
    }

    #[test]
    fn test_discover_recursive_sorted() {
        let dir = sample_tree();
        let discovery = discover(dir.path()).unwrap();
        let ids: Vec<String> = discovery.ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "ArrayTest",
                "StringTest",
                "models::UserTest",
                "models::deep::_PrivateTest",
            ]
        );
        assert_eq!(discovery.collection_names().collect::<Vec<_>>(), vec![DEFAULT_COLLECTION]);
        let user = discovery
            .suites()
            .into_iter()
            .find(|s| s.id.as_str() == "models::UserTest")
            .unwrap();
        assert_eq!(user.path, dir.path().join("models/UserTest.sh"));
    }

    #[test]
    fn test_discover_is_idempotent() {
        let dir = sample_tree();
        let first = discover(dir.path()).unwrap();
        let second = discover(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.ids(), second.ids());
    }

    #[test]
    fn test_discover_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let discovery = discover(dir.path()).unwrap();
        assert!(discovery.is_empty());
        assert!(discovery.suites().is_empty());
    }

    #[test]
    fn test_discover_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::DiscoveryRoot { .. }));
    }

    #[test]
    fn test_discover_file_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "OneTest.sh");
        let err = discover(dir.path().join("OneTest.sh")).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut discovery = Discovery::new();
        assert!(discovery.insert(DEFAULT_COLLECTION, Suite::new(SuiteId::new("ATest"), "/a")));
        assert!(!discovery.insert(DEFAULT_COLLECTION, Suite::new(SuiteId::new("ATest"), "/b")));
        assert_eq!(discovery.len(), 1);
        assert_eq!(discovery.suites()[0].path, PathBuf::from("/a"));
    }

    #[test]
    fn test_suite_from_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "OneTest.sh");
        let suite = Suite::from_file(dir.path().join("OneTest.sh")).unwrap();
        assert_eq!(suite.id.as_str(), "OneTest");
        assert!(Suite::from_file(dir.path().join("MissingTest.sh")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "ok/ATest.sh");
        touch(dir.path(), "locked/BTest.sh");
        let locked = dir.path().join("locked");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory.
        let privileged = std::fs::read_dir(&locked).is_ok();
        let result = discover(dir.path());

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        if privileged {
            return;
        }

        let discovery = result.unwrap();
        let ids: Vec<String> = discovery.ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["ok::ATest"]);
    }
}
