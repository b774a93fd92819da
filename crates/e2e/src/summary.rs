//! Reduction of a results document to a flat run summary

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::E2eError;
use crate::results::ResultsDocument;

/// Where the run came from. Copied into every summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub branch: String,
    pub commit: String,
    pub report_url: Option<String>,
}

/// Immutable snapshot of one suite execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
    /// Human-readable, see [`format_duration`].
    pub duration: String,
    pub branch: String,
    pub commit: String,
    pub failed_tests: Vec<String>,
    pub report_url: Option<String>,
}

impl RunSummary {
    /// Reduce a results document.
    ///
    /// Counters come from the document's `stats` block; the suite tree is
    /// only walked to collect failed test identifiers.
    pub fn from_document(doc: &ResultsDocument, meta: &RunMetadata) -> Self {
        let stats = &doc.stats;
        Self {
            passed: stats.expected,
            failed: stats.unexpected,
            skipped: stats.skipped,
            total: stats.expected + stats.unexpected + stats.skipped,
            duration: format_duration(stats.duration_ms()),
            branch: meta.branch.clone(),
            commit: meta.commit.clone(),
            failed_tests: doc.failed_test_paths(),
            report_url: meta.report_url.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Load and reduce the results file at `path`.
///
/// A missing or malformed file yields `None` after logging; it never aborts
/// the notification flow.
pub fn summarize(path: &Path, meta: &RunMetadata) -> Option<RunSummary> {
    match ResultsDocument::from_file(path) {
        Ok(doc) => {
            let summary = RunSummary::from_document(&doc, meta);
            debug!(
                "Summarized {}: {} passed, {} failed, {} skipped",
                path.display(),
                summary.passed,
                summary.failed,
                summary.skipped
            );
            Some(summary)
        }
        Err(E2eError::MissingResultsFile(p)) => {
            warn!("Results file not found: {}", p.display());
            None
        }
        Err(e) => {
            error!("Failed to process results {}: {}", path.display(), e);
            None
        }
    }
}

/// Format a duration in milliseconds: `850ms`, `4.2s`, `2m 5s`.
pub fn format_duration(ms: u64) -> String {
    if ms < 1_000 {
        return format!("{}ms", ms);
    }
    if ms < 60_000 {
        // Tenths of a second, rounded half-up.
        let tenths = (ms + 50) / 100;
        return format!("{}.{}s", tenths / 10, tenths % 10);
    }
    format!("{}m {}s", ms / 60_000, (ms / 1_000) % 60)
}
