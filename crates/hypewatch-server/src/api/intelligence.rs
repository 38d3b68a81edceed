use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use hypewatch_core::Relationship;
use hypewatch_sentiment::{BrandMetrics, HashtagCount, IntelligenceReport, SentimentBreakdown};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{rejection_error, ApiError, ApiResponse, AppState, ErrorCode};

const MAX_HASHTAG_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub(super) struct CompetitorsQuery {
    pub relationship: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct HashtagsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct BrandSentimentItem {
    pub brand_name: String,
    pub brand_slug: String,
    pub mentions: usize,
    pub avg_sentiment: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct SentimentView {
    pub has_data: bool,
    pub overall: SentimentBreakdown,
    pub brands: Vec<BrandSentimentItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct RefreshResult {
    pub has_data: bool,
    pub total_posts: usize,
    pub files: usize,
    pub failed_files: usize,
    pub skipped_records: usize,
    pub fingerprint: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// GET /api/v1/intelligence — the full cached report.
pub(super) async fn get_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<IntelligenceReport>> {
    let report = state.reports.current().await;
    ApiResponse::new((*report).clone(), req_id.0)
}

/// GET /api/v1/intelligence/competitors — per-brand metrics, optionally
/// filtered by `relationship=own|competitor`.
pub(super) async fn list_competitors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<CompetitorsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<BrandMetrics>>>, ApiError> {
    let Query(query) = query.map_err(|e| rejection_error(req_id.0.clone(), &e))?;
    let relationship = query
        .relationship
        .as_deref()
        .map(str::parse::<Relationship>)
        .transpose()
        .map_err(|msg| ApiError::new(req_id.0.clone(), ErrorCode::ValidationError, msg))?;

    let report = state.reports.current().await;
    let data = report
        .brands
        .iter()
        .filter(|b| relationship.is_none_or(|r| b.relationship == r))
        .cloned()
        .collect();

    Ok(ApiResponse::new(data, req_id.0))
}

/// GET /api/v1/intelligence/hashtags — top hashtags across all posts.
pub(super) async fn list_hashtags(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<HashtagsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<HashtagCount>>>, ApiError> {
    let Query(query) = query.map_err(|e| rejection_error(req_id.0.clone(), &e))?;
    let limit = query
        .limit
        .unwrap_or(state.config.top_hashtags)
        .clamp(1, MAX_HASHTAG_LIMIT);

    let report = state.reports.current().await;
    let data = report.top_hashtags.iter().take(limit).cloned().collect();
    Ok(ApiResponse::new(data, req_id.0))
}

/// GET /api/v1/intelligence/sentiment
pub(super) async fn get_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<SentimentView>> {
    let report = state.reports.current().await;
    let brands = report
        .brands
        .iter()
        .map(|b| BrandSentimentItem {
            brand_name: b.brand_name.clone(),
            brand_slug: b.brand_slug.clone(),
            mentions: b.mentions,
            avg_sentiment: b.avg_sentiment,
        })
        .collect();

    ApiResponse::new(
        SentimentView {
            has_data: report.has_data,
            overall: report.sentiment.clone(),
            brands,
        },
        req_id.0,
    )
}

/// POST /api/v1/intelligence/refresh — reload the data directory now.
pub(super) async fn refresh_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RefreshResult>>, ApiError> {
    let report = state.reports.refresh().await.map_err(|e| {
        tracing::error!(error = %e, "manual report refresh failed");
        ApiError::new(req_id.0.clone(), ErrorCode::InternalError, "report refresh failed")
    })?;

    Ok(ApiResponse::new(
        RefreshResult {
            has_data: report.has_data,
            total_posts: report.summary.total_posts,
            files: report.dataset.files.len(),
            failed_files: report.dataset.failed_files.len(),
            skipped_records: report.dataset.skipped_records,
            fingerprint: report.dataset.fingerprint.clone(),
            generated_at: report.generated_at,
        },
        req_id.0,
    ))
}
