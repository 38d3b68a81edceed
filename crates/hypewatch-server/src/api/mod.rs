mod agency;
mod calendar;
mod intelligence;
mod reports;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use hypewatch_core::AppConfig;
use hypewatch_store::{JsonStore, StoreError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::cache::ReportCache;
use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub reports: ReportCache,
    pub store: JsonStore,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

/// Machine-readable error code; each maps to exactly one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    ValidationError,
    Unauthorized,
    NotFound,
    RateLimited,
    InternalError,
}

impl ErrorCode {
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::BadRequest | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    environment: String,
    has_data: bool,
    total_posts: usize,
    report_generated_at: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(request_id: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.error.code.status(), Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    match error {
        StoreError::NotFound => ApiError::new(request_id, ErrorCode::NotFound, "record not found"),
        StoreError::Validation(msg) => ApiError::new(request_id, ErrorCode::ValidationError, msg.clone()),
        other => {
            tracing::error!(error = %other, "store operation failed");
            ApiError::new(request_id, ErrorCode::InternalError, "store operation failed")
        }
    }
}

/// Parse a path id, answering with the standard error envelope on failure.
pub(super) fn parse_id(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::new(
            request_id,
            ErrorCode::BadRequest,
            format!("'{raw}' is not a valid id"),
        )
    })
}

pub(super) fn rejection_error(
    request_id: String,
    rejection: &impl std::fmt::Display,
) -> ApiError {
    ApiError::new(request_id, ErrorCode::BadRequest, rejection.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/intelligence", get(intelligence::get_report))
        .route(
            "/api/v1/intelligence/competitors",
            get(intelligence::list_competitors),
        )
        .route(
            "/api/v1/intelligence/hashtags",
            get(intelligence::list_hashtags),
        )
        .route(
            "/api/v1/intelligence/sentiment",
            get(intelligence::get_sentiment),
        )
        .route(
            "/api/v1/intelligence/refresh",
            post(intelligence::refresh_report),
        )
        .route("/api/v1/reports/generate", get(reports::generate_report))
        .route(
            "/api/v1/calendar",
            get(calendar::list_events).post(calendar::create_event),
        )
        .route("/api/v1/calendar/view/{view}", get(calendar::view_events))
        .route(
            "/api/v1/calendar/{id}",
            get(calendar::get_event)
                .put(calendar::update_event)
                .delete(calendar::delete_event),
        )
        .route(
            "/api/v1/agency",
            get(agency::list_agencies).post(agency::create_agency),
        )
        .route(
            "/api/v1/agency/{id}",
            get(agency::get_agency)
                .put(agency::update_agency)
                .delete(agency::delete_agency),
        )
        .route(
            "/api/v1/agency/{id}/projects",
            get(agency::list_projects).post(agency::create_project),
        )
        .layer(
            // Auth runs first so only verified tokens get their own bucket.
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let report = state.reports.current().await;
    ApiResponse::new(
        HealthData {
            status: "ok",
            environment: state.config.env.to_string(),
            has_data: report.has_data,
            total_posts: report.summary.total_posts,
            report_generated_at: report.generated_at,
        },
        req_id.0,
    )
}

async fn not_found(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::new(req_id.0, ErrorCode::NotFound, "no such route")
}
