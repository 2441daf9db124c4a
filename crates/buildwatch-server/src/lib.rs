//! Transport binding for the buildwatch collector.
//!
//! Exposes two gRPC surfaces on one listener: the ingestion surface the
//! build orchestrator publishes ordered build events to, and the query
//! surface report consumers read extracted diagnostics from. The
//! handlers themselves live in [`ingest`] and [`query`]; everything in
//! here is wiring.

pub mod config;
pub mod ingest;
pub mod query;
pub mod recorder;

use std::sync::Arc;

use buildwatch_proto::orchestrator::v1::publish_build_event_server::PublishBuildEventServer;
use buildwatch_proto::report::v1::report_service_server::ReportServiceServer;
use buildwatch_store::ReportStore;
use tonic::transport::server::Router;
use tonic::transport::Server;

use crate::ingest::BuildEventSink;
use crate::query::ReportQuery;
use crate::recorder::Recorder;

/// Assembles the gRPC router serving both surfaces over one listener.
///
/// The store is the only state shared between the two services; the
/// recorder is an optional debug side channel (see [`recorder`]) and
/// `None` in normal operation.
pub fn server(store: Arc<ReportStore>, recorder: Option<Arc<Recorder>>) -> Router {
    Server::builder()
        .add_service(PublishBuildEventServer::new(BuildEventSink::new(
            Arc::clone(&store),
            recorder,
        )))
        .add_service(ReportServiceServer::new(ReportQuery::new(store)))
}
