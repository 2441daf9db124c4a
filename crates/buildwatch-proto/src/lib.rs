//! Generated wire types for both RPC surfaces, plus the small amount of
//! hand-written glue around them: Any packing/unpacking for the
//! polymorphic tool event, timestamp conversion, and mapping from the
//! internal report model to its wire representation.

pub mod orchestrator {
    pub mod v1 {
        tonic::include_proto!("buildwatch.orchestrator.v1");
    }
}

pub mod tool {
    pub mod v1 {
        tonic::include_proto!("buildwatch.tool.v1");
    }
}

pub mod report {
    pub mod v1 {
        tonic::include_proto!("buildwatch.report.v1");
    }
}

mod convert;

pub use convert::{
    datetime_to_timestamp, pack_tool_event, report_to_proto, timestamp_to_datetime,
    unpack_tool_event, TOOL_EVENT_TYPE_URL,
};
