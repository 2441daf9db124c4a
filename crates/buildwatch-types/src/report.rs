//! Report and diagnostic records.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One compiler diagnostic extracted from a build's console output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Path of the offending file, relative to the workspace root.
    pub path_in_workspace: String,
    /// 1-based source line.
    pub line: u32,
    /// 1-based source column. `None` when the compiler did not report
    /// one; this is distinct from column zero.
    pub column: Option<u32>,
    /// The single-line diagnostic text following the location prefix.
    pub message: String,
    /// Verbatim lines that followed the diagnostic line (source excerpt,
    /// caret marker), in original order.
    pub context: Vec<String>,
}

/// The accumulated diagnostics for one build of one workspace.
///
/// A report is assembled incrementally by the stream handler and becomes
/// immutable once published into the store: it is moved in wholesale and
/// only ever cloned out, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Absolute path of the workspace root the build ran in. Store key.
    pub workspace_path: PathBuf,
    /// Build start time, at nanosecond precision, taken from the event
    /// stream's `Started` event.
    pub time: DateTime<Utc>,
    /// Diagnostics in the order they were discovered in the stream.
    pub errors: Vec<Diagnostic>,
}
