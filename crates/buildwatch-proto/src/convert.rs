//! Conversions between wire types and the internal model.

use chrono::{DateTime, Utc};
use prost::Message;

use crate::report::v1 as report_proto;
use crate::tool::v1::ToolEvent;

/// Type URL under which [`ToolEvent`] travels inside the stream's Any
/// wrapper.
pub const TOOL_EVENT_TYPE_URL: &str = "type.googleapis.com/buildwatch.tool.v1.ToolEvent";

/// Wraps a tool event into a type-erased Any, as the orchestrator does.
pub fn pack_tool_event(event: &ToolEvent) -> prost_types::Any {
    prost_types::Any {
        type_url: TOOL_EVENT_TYPE_URL.to_string(),
        value: event.encode_to_vec(),
    }
}

/// Unpacks a tool event from an Any wrapper.
///
/// Returns `None` when the type URL names something else or the bytes do
/// not decode; both are normal forward-compatibility cases, not errors.
pub fn unpack_tool_event(any: &prost_types::Any) -> Option<ToolEvent> {
    let full_name = any.type_url.rsplit('/').next()?;
    if full_name != "buildwatch.tool.v1.ToolEvent" {
        return None;
    }
    ToolEvent::decode(any.value.as_slice()).ok()
}

/// Converts a protobuf timestamp to a chrono instant, preserving
/// nanosecond precision. `None` for out-of-range or malformed values.
pub fn timestamp_to_datetime(timestamp: &prost_types::Timestamp) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(timestamp.nanos).ok()?;
    DateTime::from_timestamp(timestamp.seconds, nanos)
}

/// Converts a chrono instant back to a protobuf timestamp.
pub fn datetime_to_timestamp(datetime: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: datetime.timestamp(),
        nanos: datetime.timestamp_subsec_nanos() as i32,
    }
}

/// Maps an internal report to its wire representation.
pub fn report_to_proto(report: &buildwatch_types::Report) -> report_proto::Report {
    report_proto::Report {
        time: Some(datetime_to_timestamp(report.time)),
        errors: report.errors.iter().map(diagnostic_to_proto).collect(),
    }
}

fn diagnostic_to_proto(diagnostic: &buildwatch_types::Diagnostic) -> report_proto::Error {
    report_proto::Error {
        path_in_workspace: diagnostic.path_in_workspace.clone(),
        line: diagnostic.line,
        column: diagnostic.column,
        message: diagnostic.message.clone(),
        context: diagnostic.context.clone(),
    }
}
