//! Agency and project handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use hypewatch_store::{Agency, AgencyPatch, NewAgency, NewProject, Project};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_store_error, parse_id, rejection_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct DeletedAgency {
    pub agency: Agency,
    pub projects_removed: usize,
}

/// GET /api/v1/agency
pub(super) async fn list_agencies(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Agency>>>, ApiError> {
    let agencies = hypewatch_store::list_agencies(&state.store)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(agencies, req_id.0))
}

/// POST /api/v1/agency
pub(super) async fn create_agency(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<NewAgency>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Agency>>), ApiError> {
    let Json(new) = body.map_err(|e| rejection_error(req_id.0.clone(), &e))?;
    let agency = hypewatch_store::create_agency(&state.store, new)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok((StatusCode::CREATED, ApiResponse::new(agency, req_id.0)))
}

/// GET /api/v1/agency/{id}
pub(super) async fn get_agency(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Agency>>, ApiError> {
    let id = parse_id(&req_id.0, &id)?;
    let agency = hypewatch_store::get_agency(&state.store, id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(agency, req_id.0))
}

/// PUT /api/v1/agency/{id} — partial update; absent fields are kept.
pub(super) async fn update_agency(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    body: Result<Json<AgencyPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<Agency>>, ApiError> {
    let id = parse_id(&req_id.0, &id)?;
    let Json(patch) = body.map_err(|e| rejection_error(req_id.0.clone(), &e))?;
    let agency = hypewatch_store::update_agency(&state.store, id, patch)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(agency, req_id.0))
}

/// DELETE /api/v1/agency/{id} — also removes the agency's projects.
pub(super) async fn delete_agency(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedAgency>>, ApiError> {
    let id = parse_id(&req_id.0, &id)?;
    let (agency, projects_removed) = hypewatch_store::delete_agency(&state.store, id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(
        DeletedAgency {
            agency,
            projects_removed,
        },
        req_id.0,
    ))
}

/// GET /api/v1/agency/{id}/projects
pub(super) async fn list_projects(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Project>>>, ApiError> {
    let id = parse_id(&req_id.0, &id)?;
    let projects = hypewatch_store::list_projects(&state.store, id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(projects, req_id.0))
}

/// POST /api/v1/agency/{id}/projects
pub(super) async fn create_project(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    body: Result<Json<NewProject>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), ApiError> {
    let id = parse_id(&req_id.0, &id)?;
    let Json(new) = body.map_err(|e| rejection_error(req_id.0.clone(), &e))?;
    let project = hypewatch_store::create_project(&state.store, id, new)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok((StatusCode::CREATED, ApiResponse::new(project, req_id.0)))
}
