//! In-memory report store.
//!
//! Holds the single most recent [`Report`] per workspace, written by
//! stream handlers on stream completion and read concurrently by the
//! query handler. Entries live for the process lifetime; loss on restart
//! is an accepted trade-off of the design.
//!
//! Keys are compared by exact equality after lexical normalization (see
//! [`buildwatch_types::normalize_path`]), so `/a/b/` and `/a/./b` hit
//! the same entry. Subpath containment is deliberately not supported: it
//! makes lookups ambiguous when one workspace is nested inside another.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use buildwatch_types::{normalize_path, Report};

/// Concurrency-safe map from normalized workspace path to latest report.
///
/// A single mutex guards the whole map for both reads and writes. Every
/// operation is a map lookup or assignment and never holds the guard
/// across an await point, so a std sync lock is the right tool here and
/// per-key locking would be wasted machinery.
#[derive(Debug, Default)]
pub struct ReportStore {
    reports: Mutex<HashMap<PathBuf, Report>>,
}

impl ReportStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a report, replacing any existing report for the same
    /// (normalized) workspace path. Last write wins; there is no merge.
    pub fn put(&self, report: Report) {
        let key = normalize_path(&report.workspace_path);
        self.reports
            .lock()
            .expect("report store lock poisoned")
            .insert(key, report);
    }

    /// Returns a clone of the report for the given workspace path, or
    /// `None` if no build has published one. Readers always observe a
    /// whole report, never a partially written one.
    pub fn get(&self, workspace_path: &Path) -> Option<Report> {
        let key = normalize_path(workspace_path);
        self.reports
            .lock()
            .expect("report store lock poisoned")
            .get(&key)
            .cloned()
    }
}
