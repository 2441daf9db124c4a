//! The query surface: report lookup by workspace path.

use std::path::Path;
use std::sync::Arc;

use buildwatch_proto::report::v1::report_service_server::ReportService;
use buildwatch_proto::report::v1::{GetReportRequest, GetReportResponse};
use buildwatch_proto::report_to_proto;
use buildwatch_store::ReportStore;
use tonic::{Request, Response, Status};

/// Stateless per-request handler reading the report store. Never mutates
/// the store.
pub struct ReportQuery {
    store: Arc<ReportStore>,
}

impl ReportQuery {
    pub fn new(store: Arc<ReportStore>) -> Self {
        Self { store }
    }
}

#[tonic::async_trait]
impl ReportService for ReportQuery {
    async fn get_report(
        &self,
        request: Request<GetReportRequest>,
    ) -> Result<Response<GetReportResponse>, Status> {
        let request = request.into_inner();

        // Validation happens before any store access.
        let Some(workspace_path) = request.workspace_path else {
            return Err(Status::invalid_argument(
                "missing `workspace_path` in request",
            ));
        };
        let path = Path::new(&workspace_path);
        if !path.is_absolute() {
            return Err(Status::invalid_argument("`workspace_path` must be absolute"));
        }

        let Some(report) = self.store.get(path) else {
            return Err(Status::not_found(format!(
                "no report for workspace `{workspace_path}`"
            )));
        };

        Ok(Response::new(GetReportResponse {
            report: Some(report_to_proto(&report)),
        }))
    }
}
