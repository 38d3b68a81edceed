use axum::{extract::State, Extension, Json};
use hypewatch_sentiment::{render_markdown, IntelligenceReport};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct GeneratedReport {
    pub markdown: String,
    pub report: IntelligenceReport,
}

/// GET /api/v1/reports/generate — markdown write-up of the cached report.
pub(super) async fn generate_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<GeneratedReport>> {
    let report = state.reports.current().await;
    let markdown = render_markdown(&report);
    ApiResponse::new(
        GeneratedReport {
            markdown,
            report: (*report).clone(),
        },
        req_id.0,
    )
}
