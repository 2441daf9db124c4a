//! Integration tests for the report query surface: validation order,
//! typed failures, and wire-faithful report serialization.

mod common;

use std::sync::Arc;

use buildwatch_proto::report::v1::report_service_client::ReportServiceClient;
use buildwatch_proto::report::v1::GetReportRequest;
use buildwatch_store::ReportStore;
use buildwatch_types::{Diagnostic, Report};
use chrono::{TimeZone, Utc};
use tonic::Code;

async fn client(addr: std::net::SocketAddr) -> ReportServiceClient<tonic::transport::Channel> {
    ReportServiceClient::new(common::connect(addr).await)
}

fn sample_report() -> Report {
    Report {
        workspace_path: "/some/project".into(),
        time: Utc.timestamp_opt(1_764, 863_274_000).unwrap(),
        errors: vec![
            Diagnostic {
                path_in_workspace: "main.cc".to_string(),
                line: 5,
                column: None,
                message: "Problem".to_string(),
                context: vec!["Here...".to_string(), "...or there".to_string()],
            },
            Diagnostic {
                path_in_workspace: "lib.cc".to_string(),
                line: 12,
                column: Some(3),
                message: "Other problem".to_string(),
                context: Vec::new(),
            },
        ],
    }
}

#[tokio::test]
async fn missing_workspace_path_is_invalid_argument() {
    let addr = common::start_server(Arc::new(ReportStore::new()), None).await;
    let mut client = client(addr).await;

    let status = client
        .get_report(GetReportRequest {
            workspace_path: None,
        })
        .await
        .expect_err("missing path must be rejected");
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "missing `workspace_path` in request");
}

#[tokio::test]
async fn relative_workspace_path_is_invalid_argument() {
    let addr = common::start_server(Arc::new(ReportStore::new()), None).await;
    let mut client = client(addr).await;

    let status = client
        .get_report(GetReportRequest {
            workspace_path: Some("some/project".to_string()),
        })
        .await
        .expect_err("relative path must be rejected");
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "`workspace_path` must be absolute");
}

#[tokio::test]
async fn unknown_workspace_is_not_found() {
    let addr = common::start_server(Arc::new(ReportStore::new()), None).await;
    let mut client = client(addr).await;

    let status = client
        .get_report(GetReportRequest {
            workspace_path: Some("/not/existing".to_string()),
        })
        .await
        .expect_err("unknown workspace must be not-found");
    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), "no report for workspace `/not/existing`");
}

#[tokio::test]
async fn existing_report_is_returned_in_full() {
    let store = Arc::new(ReportStore::new());
    store.put(sample_report());
    let addr = common::start_server(store, None).await;
    let mut client = client(addr).await;

    let response = client
        .get_report(GetReportRequest {
            workspace_path: Some("/some/project".to_string()),
        })
        .await
        .expect("existing report should be found")
        .into_inner();

    let report = response.report.expect("response carries the report");
    let time = report.time.expect("report carries the start time");
    assert_eq!(time.seconds, 1_764);
    assert_eq!(time.nanos, 863_274_000);

    assert_eq!(report.errors.len(), 2);
    let first = &report.errors[0];
    assert_eq!(first.path_in_workspace, "main.cc");
    assert_eq!(first.line, 5);
    assert_eq!(first.column, None, "unknown column stays unset on the wire");
    assert_eq!(first.message, "Problem");
    assert_eq!(first.context, vec!["Here...", "...or there"]);

    let second = &report.errors[1];
    assert_eq!(second.column, Some(3));
    assert!(second.context.is_empty());
}

#[tokio::test]
async fn lookup_normalizes_the_requested_path() {
    let store = Arc::new(ReportStore::new());
    store.put(sample_report());
    let addr = common::start_server(store, None).await;
    let mut client = client(addr).await;

    let response = client
        .get_report(GetReportRequest {
            workspace_path: Some("/some/./project/".to_string()),
        })
        .await
        .expect("spelling variants of the key must match");
    assert!(response.into_inner().report.is_some());
}

#[tokio::test]
async fn subpath_of_a_known_workspace_is_not_found() {
    let store = Arc::new(ReportStore::new());
    store.put(sample_report());
    let addr = common::start_server(store, None).await;
    let mut client = client(addr).await;

    let status = client
        .get_report(GetReportRequest {
            workspace_path: Some("/some/project/nested".to_string()),
        })
        .await
        .expect_err("exact-match policy: subpaths do not resolve");
    assert_eq!(status.code(), Code::NotFound);
}
