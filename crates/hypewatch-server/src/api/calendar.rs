//! Marketing calendar handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use hypewatch_store::{
    CalendarEvent, CalendarEventPatch, CalendarView, NewCalendarEvent, ViewWindow,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{
    map_store_error, parse_id, rejection_error, ApiError, ApiResponse, AppState,
    ErrorCode,
};

#[derive(Debug, Deserialize)]
pub(super) struct RangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ViewQuery {
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/calendar — all events, or those overlapping `from`..`to`.
pub(super) async fn list_events(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<CalendarEvent>>>, ApiError> {
    let Query(range) = query.map_err(|e| rejection_error(req_id.0.clone(), &e))?;

    let events = match (range.from, range.to) {
        (None, None) => hypewatch_store::list_events(&state.store).await,
        (from, to) => {
            let from = from.unwrap_or(DateTime::<Utc>::MIN_UTC);
            let to = to.unwrap_or(DateTime::<Utc>::MAX_UTC);
            if to <= from {
                return Err(ApiError::new(
                    req_id.0,
                    ErrorCode::ValidationError,
                    "'to' must be after 'from'",
                ));
            }
            hypewatch_store::events_in_range(&state.store, from, to).await
        }
    }
    .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(events, req_id.0))
}

/// GET /api/v1/calendar/view/{view}?date= — day, week, or month page.
pub(super) async fn view_events(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(view): Path<String>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ViewWindow>>, ApiError> {
    let Query(query) = query.map_err(|e| rejection_error(req_id.0.clone(), &e))?;
    let view: CalendarView = view
        .parse()
        .map_err(|msg: String| ApiError::new(req_id.0.clone(), ErrorCode::ValidationError, msg))?;
    let anchor = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let window = hypewatch_store::calendar_view(&state.store, view, anchor)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(window, req_id.0))
}

/// POST /api/v1/calendar
pub(super) async fn create_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<NewCalendarEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CalendarEvent>>), ApiError> {
    let Json(new) = body.map_err(|e| rejection_error(req_id.0.clone(), &e))?;
    let event = hypewatch_store::create_event(&state.store, new)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok((StatusCode::CREATED, ApiResponse::new(event, req_id.0)))
}

/// GET /api/v1/calendar/{id}
pub(super) async fn get_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CalendarEvent>>, ApiError> {
    let id = parse_id(&req_id.0, &id)?;
    let event = hypewatch_store::get_event(&state.store, id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(event, req_id.0))
}

/// PUT /api/v1/calendar/{id} — partial update; absent fields are kept.
pub(super) async fn update_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    body: Result<Json<CalendarEventPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<CalendarEvent>>, ApiError> {
    let id = parse_id(&req_id.0, &id)?;
    let Json(patch) = body.map_err(|e| rejection_error(req_id.0.clone(), &e))?;
    let event = hypewatch_store::update_event(&state.store, id, patch)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(event, req_id.0))
}

/// DELETE /api/v1/calendar/{id}
pub(super) async fn delete_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CalendarEvent>>, ApiError> {
    let id = parse_id(&req_id.0, &id)?;
    let event = hypewatch_store::delete_event(&state.store, id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(event, req_id.0))
}
