//! Playwright JSON results document
//!
//! Only the parts of the reporter output the harness reads are modelled here.
//! Every field is optional on the wire: absent counters read as zero and
//! absent lists as empty.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

/// Separator between ancestor suite titles and the test title.
pub const PATH_SEPARATOR: &str = " > ";

/// Root of a results document, as written by `--reporter=json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsDocument {
    #[serde(default)]
    pub stats: Stats,

    #[serde(default)]
    pub suites: Vec<Suite>,
}

/// Precomputed counters for the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Tests whose outcome matched the expectation.
    #[serde(default)]
    pub expected: usize,

    /// Tests whose outcome did not match the expectation.
    #[serde(default)]
    pub unexpected: usize,

    #[serde(default)]
    pub skipped: usize,

    /// Wall-clock duration in milliseconds. The reporter writes fractions.
    #[serde(default)]
    pub duration: f64,
}

impl Stats {
    /// Duration truncated to whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        // `as` saturates and maps NaN to zero.
        self.duration.max(0.0) as u64
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Suite {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub suites: Vec<Suite>,

    #[serde(default)]
    pub tests: Vec<Test>,

    /// Playwright groups per-project tests under specs inside file suites.
    #[serde(default)]
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spec {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub tests: Vec<Test>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Test {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub results: Vec<Attempt>,
}

/// One execution of a test. Retries produce several attempts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attempt {
    #[serde(default)]
    pub status: AttemptStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttemptStatus {
    Passed,
    Failed,
    Skipped,
    /// `timedOut`, `interrupted` and anything newer.
    #[default]
    #[serde(other)]
    Other,
}

impl Test {
    /// A test is failed as soon as one of its attempts failed.
    pub fn has_failed_attempt(&self) -> bool {
        self.results.iter().any(|r| r.status == AttemptStatus::Failed)
    }
}

impl Spec {
    pub fn has_failed_attempt(&self) -> bool {
        self.tests.iter().any(Test::has_failed_attempt)
    }
}

impl ResultsDocument {
    /// Parse a results document from a JSON string
    pub fn from_json(json: &str) -> E2eResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a results document from disk
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(E2eError::MissingResultsFile(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_json(&content)
    }

    /// Identifiers of every failed test, depth-first in document order.
    ///
    /// Within a suite its own tests come first, then its specs, then its
    /// child suites.
    pub fn failed_test_paths(&self) -> Vec<String> {
        let mut failed = Vec::new();
        for suite in &self.suites {
            collect_failed(suite, "", &mut failed);
        }
        failed
    }
}

/// An empty parent path is dropped rather than joined, so a root suite
/// without a title does not prefix its children with a separator.
fn collect_failed(suite: &Suite, parent: &str, failed: &mut Vec<String>) {
    let path = if parent.is_empty() {
        suite.title.clone()
    } else {
        format!("{}{}{}", parent, PATH_SEPARATOR, suite.title)
    };

    let failing_tests = suite
        .tests
        .iter()
        .filter(|t| t.has_failed_attempt())
        .map(|t| t.title.as_str());
    let failing_specs = suite
        .specs
        .iter()
        .filter(|s| s.has_failed_attempt())
        .map(|s| s.title.as_str());

    for title in failing_tests.chain(failing_specs) {
        failed.push(format!("{}{}{}", path, PATH_SEPARATOR, title));
    }

    for child in &suite.suites {
        collect_failed(child, &path, failed);
    }
}
