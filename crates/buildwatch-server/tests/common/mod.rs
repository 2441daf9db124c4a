//! Shared helpers for the server integration tests: ephemeral test
//! server, client channel, and orchestrator-side message builders.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use buildwatch_proto::orchestrator::v1::{
    build_event, BuildComponentStreamFinished, BuildEvent, OrderedBuildEvent,
    PublishBuildToolEventStreamRequest, StreamId,
};
use buildwatch_proto::pack_tool_event;
use buildwatch_proto::tool::v1::{
    tool_event, tool_event_id, BuildStarted, Progress, TargetConfigured, TargetConfiguredId,
    ToolEvent, ToolEventId,
};
use buildwatch_server::recorder::Recorder;
use buildwatch_store::ReportStore;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Channel;

/// Starts the gRPC server on an ephemeral port, serving the given store.
pub async fn start_server(store: Arc<ReportStore>, recorder: Option<Arc<Recorder>>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind an ephemeral port");
    let addr = listener.local_addr().expect("listener should have an address");
    tokio::spawn(async move {
        buildwatch_server::server(store, recorder)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .expect("test server should not fail");
    });
    addr
}

/// Connects a client channel to the test server.
pub async fn connect(addr: SocketAddr) -> Channel {
    tonic::transport::Endpoint::from_shared(format!("http://{addr}"))
        .expect("endpoint should parse")
        .connect()
        .await
        .expect("should connect to test server")
}

pub fn stream_id() -> StreamId {
    StreamId {
        build_id: "build-1".to_string(),
        invocation_id: "invocation-1".to_string(),
    }
}

/// Wraps a build event into the ordered stream request envelope.
pub fn request(
    sequence_number: i64,
    event: Option<build_event::Event>,
) -> PublishBuildToolEventStreamRequest {
    PublishBuildToolEventStreamRequest {
        ordered_build_event: Some(OrderedBuildEvent {
            stream_id: Some(stream_id()),
            sequence_number,
            event: Some(BuildEvent {
                event_time: None,
                event,
            }),
        }),
    }
}

/// Wraps a tool event into an Any-carrying stream request.
pub fn tool_request(
    sequence_number: i64,
    id: Option<ToolEventId>,
    payload: Option<tool_event::Payload>,
) -> PublishBuildToolEventStreamRequest {
    let event = ToolEvent {
        id,
        children: Vec::new(),
        payload,
    };
    request(
        sequence_number,
        Some(build_event::Event::ToolEvent(pack_tool_event(&event))),
    )
}

pub fn started(
    sequence_number: i64,
    workspace: &str,
    seconds: i64,
    nanos: i32,
) -> PublishBuildToolEventStreamRequest {
    tool_request(
        sequence_number,
        None,
        Some(tool_event::Payload::Started(BuildStarted {
            uuid: "a1b2".to_string(),
            workspace_directory: workspace.to_string(),
            start_time: Some(prost_types::Timestamp { seconds, nanos }),
        })),
    )
}

pub fn progress(sequence_number: i64, stderr: &str) -> PublishBuildToolEventStreamRequest {
    tool_request(
        sequence_number,
        None,
        Some(tool_event::Payload::Progress(Progress {
            stdout: String::new(),
            stderr: stderr.to_string(),
        })),
    )
}

pub fn configured(sequence_number: i64, label: &str) -> PublishBuildToolEventStreamRequest {
    tool_request(
        sequence_number,
        Some(ToolEventId {
            id: Some(tool_event_id::Id::TargetConfigured(TargetConfiguredId {
                label: label.to_string(),
            })),
        }),
        Some(tool_event::Payload::Configured(TargetConfigured {
            target_kind: "cc_binary rule".to_string(),
        })),
    )
}

pub fn finished(sequence_number: i64) -> PublishBuildToolEventStreamRequest {
    request(
        sequence_number,
        Some(build_event::Event::ComponentStreamFinished(
            BuildComponentStreamFinished { r#type: 1 },
        )),
    )
}
