//! The event-ingestion surface: one handler task per build event stream.
//!
//! The orchestrator opens one bidirectional stream per build and sends
//! ordered build events over it. The transport contract is strict: every
//! inbound message is acknowledged by echoing its stream id and sequence
//! number, and the peer does not advance until it has read the ack. The
//! handler therefore runs a sequential read → ack → process → read loop
//! with no intra-stream parallelism; the ack channel has capacity one so
//! the ack is handed to the transport before the payload is touched.
//!
//! Across streams the handlers are fully independent; the report store
//! is the only shared state.

use std::path::PathBuf;
use std::sync::Arc;

use buildwatch_proto::orchestrator::v1::publish_build_event_server::PublishBuildEvent;
use buildwatch_proto::orchestrator::v1::{
    build_event, OrderedBuildEvent, PublishBuildToolEventStreamRequest,
    PublishBuildToolEventStreamResponse, PublishLifecycleEventRequest,
};
use buildwatch_proto::tool::v1::{tool_event, tool_event_id, BuildStarted, Progress, ToolEventId};
use buildwatch_proto::{timestamp_to_datetime, unpack_tool_event};
use buildwatch_store::ReportStore;
use buildwatch_types::{RecordedEvent, RecordedPayload, Report};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};

use crate::recorder::Recorder;

/// The ingestion service: accepts lifecycle calls and build-tool event
/// streams from the orchestrator.
pub struct BuildEventSink {
    store: Arc<ReportStore>,
    recorder: Option<Arc<Recorder>>,
}

impl BuildEventSink {
    /// Creates the sink. `recorder` attaches the debug recording side
    /// channel; pass `None` in normal operation.
    pub fn new(store: Arc<ReportStore>, recorder: Option<Arc<Recorder>>) -> Self {
        Self { store, recorder }
    }
}

#[tonic::async_trait]
impl PublishBuildEvent for BuildEventSink {
    async fn publish_lifecycle_event(
        &self,
        _request: Request<PublishLifecycleEventRequest>,
    ) -> Result<Response<()>, Status> {
        // Lifecycle events carry nothing the collector consumes; they
        // are acknowledged unconditionally.
        Ok(Response::new(()))
    }

    type PublishBuildToolEventStreamStream =
        ReceiverStream<Result<PublishBuildToolEventStreamResponse, Status>>;

    async fn publish_build_tool_event_stream(
        &self,
        request: Request<Streaming<PublishBuildToolEventStreamRequest>>,
    ) -> Result<Response<Self::PublishBuildToolEventStreamStream>, Status> {
        let mut inbound = request.into_inner();
        // Capacity 1: each ack must reach the transport before the next
        // read, and the loop below never has two acks in flight.
        let (ack_tx, ack_rx) = mpsc::channel(1);
        let store = Arc::clone(&self.store);
        let recorder = self.recorder.clone();

        tokio::spawn(async move {
            let mut accumulator = StreamAccumulator::new(recorder);
            loop {
                let message = match inbound.message().await {
                    Ok(Some(message)) => message,
                    Ok(None) => {
                        tracing::debug!("peer closed stream without finish marker");
                        return;
                    }
                    Err(status) => {
                        tracing::debug!(%status, "stream failed");
                        return;
                    }
                };
                let OrderedBuildEvent {
                    stream_id,
                    sequence_number,
                    event,
                } = message.ordered_build_event.unwrap_or_default();

                // The peer will not send message n+1 until it has read
                // the ack for message n, so this send is the stream's
                // only suspension point besides the read above.
                let ack = PublishBuildToolEventStreamResponse {
                    stream_id,
                    sequence_number,
                };
                if ack_tx.send(Ok(ack)).await.is_err() {
                    tracing::debug!("peer stopped reading acks");
                    return;
                }

                match event.and_then(|e| e.event) {
                    Some(build_event::Event::ComponentStreamFinished(_)) => {
                        accumulator.record(sequence_number, RecordedPayload::StreamFinished);
                        accumulator.finish(&store);
                        return;
                    }
                    Some(build_event::Event::ToolEvent(any)) => {
                        match unpack_tool_event(&any) {
                            Some(tool_event) => accumulator.process(sequence_number, tool_event),
                            None => {
                                // A corrupt or foreign payload must not
                                // abort the stream.
                                tracing::debug!(
                                    sequence_number,
                                    type_url = %any.type_url,
                                    "skipping payload that failed to unpack"
                                );
                                accumulator.record(sequence_number, RecordedPayload::Unrecognized);
                            }
                        }
                    }
                    None => {
                        tracing::debug!(sequence_number, "skipping message with no event");
                    }
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(ack_rx)))
    }
}

/// Per-stream state: the in-progress report plus recording bookkeeping.
///
/// Owned exclusively by its stream's handler task and dropped when the
/// stream ends. Only a normally-finished stream hands its report to the
/// store; on abnormal termination the task returns early and everything
/// here is discarded, so partial reports are never published.
struct StreamAccumulator {
    report: Option<Report>,
    recorder: Option<Arc<Recorder>>,
    recording: Vec<RecordedEvent>,
    labels: Vec<String>,
}

impl StreamAccumulator {
    fn new(recorder: Option<Arc<Recorder>>) -> Self {
        Self {
            report: None,
            recorder,
            recording: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Handles one successfully unpacked tool event.
    fn process(&mut self, sequence_number: i64, event: buildwatch_proto::tool::v1::ToolEvent) {
        for child in &event.children {
            tracing::debug!(sequence_number, child = id_name(child), "child event");
        }

        match event.payload {
            Some(tool_event::Payload::Started(started)) => {
                self.record(
                    sequence_number,
                    RecordedPayload::Started {
                        workspace_directory: started.workspace_directory.clone(),
                        start_time_unix_nanos: started
                            .start_time
                            .as_ref()
                            .and_then(timestamp_to_datetime)
                            .and_then(|t| t.timestamp_nanos_opt())
                            .unwrap_or(0),
                    },
                );
                self.on_started(&started);
            }
            Some(tool_event::Payload::Progress(progress)) => {
                self.record(
                    sequence_number,
                    RecordedPayload::Progress {
                        stderr_lines: buildwatch_extract::to_lines(&progress.stderr),
                    },
                );
                self.on_progress(&progress);
            }
            Some(tool_event::Payload::Configured(_)) => {
                // Only the recorder cares about configured targets; the
                // label lives on the event's id.
                if let Some(label) = configured_label(event.id.as_ref()) {
                    tracing::debug!(sequence_number, label, "target configured");
                    self.record(
                        sequence_number,
                        RecordedPayload::Configured {
                            label: label.to_string(),
                        },
                    );
                    if self.recorder.is_some() {
                        self.labels.push(label.to_string());
                    }
                }
            }
            None => {
                // Forward compatibility: event kinds this collector does
                // not understand are ignored without error.
                tracing::debug!(sequence_number, "ignoring unrecognized event kind");
                self.record(sequence_number, RecordedPayload::Unrecognized);
            }
        }
    }

    /// A `Started` event opens (or re-keys) the in-progress report. A
    /// second `Started` in one stream overwrites the metadata but keeps
    /// errors accumulated so far; this path is defensive, the
    /// orchestrator is not expected to exercise it.
    fn on_started(&mut self, started: &BuildStarted) {
        let time = started
            .start_time
            .as_ref()
            .and_then(timestamp_to_datetime)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let errors = self.report.take().map(|r| r.errors).unwrap_or_default();
        tracing::debug!(workspace = %started.workspace_directory, "build started");
        self.report = Some(Report {
            workspace_path: PathBuf::from(&started.workspace_directory),
            time,
            errors,
        });
    }

    /// Progress output is mined for diagnostics; discovery order across
    /// all progress events of the stream is preserved. Progress before
    /// any `Started` has no report to attach to and is dropped.
    fn on_progress(&mut self, progress: &Progress) {
        if let Some(report) = &mut self.report {
            report
                .errors
                .extend(buildwatch_extract::extract(&progress.stderr));
        }
    }

    fn record(&mut self, sequence_number: i64, payload: RecordedPayload) {
        if self.recorder.is_some() {
            self.recording.push(RecordedEvent {
                sequence_number,
                payload,
            });
        }
    }

    /// Normal stream completion: publish the report, if any, and flush
    /// the recording side channel.
    fn finish(self, store: &ReportStore) {
        if let Some(report) = self.report {
            tracing::info!(
                workspace = %report.workspace_path.display(),
                errors = report.errors.len(),
                "publishing report"
            );
            store.put(report);
        }

        if let Some(recorder) = &self.recorder {
            match recorder.write(&self.labels, &self.recording) {
                Ok(path) => tracing::info!(path = %path.display(), "recorded stream"),
                Err(error) => tracing::warn!(%error, "recording failed"),
            }
        }
    }
}

fn configured_label(id: Option<&ToolEventId>) -> Option<&str> {
    match id?.id.as_ref()? {
        tool_event_id::Id::TargetConfigured(target) => Some(target.label.as_str()),
        tool_event_id::Id::Opaque(_) => None,
    }
}

fn id_name(id: &ToolEventId) -> &'static str {
    match id.id {
        Some(tool_event_id::Id::TargetConfigured(_)) => "target_configured",
        Some(tool_event_id::Id::Opaque(_)) => "opaque",
        None => "unknown",
    }
}
