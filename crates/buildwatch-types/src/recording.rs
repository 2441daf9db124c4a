//! Serde mirror types for the debug recorder.
//!
//! The recorder persists the reconstructed build-tool event sequence of a
//! stream as JSON so it can be replayed as a test fixture. These types
//! deliberately mirror the wire payloads rather than reusing the
//! generated prost structs: prost messages carry no serde derives, and
//! the recording only needs the fields the collector actually consumes.

use serde::{Deserialize, Serialize};

/// One recorded entry of an ingestion stream, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Sequence number the orchestrator assigned to the wrapping message.
    pub sequence_number: i64,
    /// The decoded build-tool payload.
    pub payload: RecordedPayload,
}

/// The build-tool event kinds the collector understands, plus a fallback
/// for everything it does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordedPayload {
    /// A build started in the given workspace.
    Started {
        workspace_directory: String,
        start_time_unix_nanos: i64,
    },
    /// Raw console output for one build step, already split into lines.
    Progress { stderr_lines: Vec<String> },
    /// A target was configured.
    Configured { label: String },
    /// The component stream finished normally.
    StreamFinished,
    /// Any payload the collector does not recognize or failed to unpack.
    Unrecognized,
}
