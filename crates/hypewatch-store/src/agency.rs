//! Store operations for the `agencies` and `projects` collections.

use uuid::Uuid;

use crate::models::{Agency, AgencyPatch, NewAgency, NewProject, Project};
use crate::{JsonStore, StoreError};

/// All agencies ordered by name.
///
/// # Errors
///
/// Returns [`StoreError`] if the collection cannot be read.
pub async fn list_agencies(store: &JsonStore) -> Result<Vec<Agency>, StoreError> {
    let mut agencies: Vec<Agency> = store.list().await?;
    agencies.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(agencies)
}

/// # Errors
///
/// Returns [`StoreError::NotFound`] if no agency has `id`.
pub async fn get_agency(store: &JsonStore, id: Uuid) -> Result<Agency, StoreError> {
    store.get(id).await
}

/// # Errors
///
/// Returns [`StoreError::Validation`] for an invalid payload, or an I/O error.
pub async fn create_agency(store: &JsonStore, new: NewAgency) -> Result<Agency, StoreError> {
    let agency = store.insert(Agency::from_new(new)?).await?;
    tracing::info!(agency_id = %agency.id, name = %agency.name, "agency created");
    Ok(agency)
}

/// # Errors
///
/// Returns [`StoreError::NotFound`] or [`StoreError::Validation`].
pub async fn update_agency(
    store: &JsonStore,
    id: Uuid,
    patch: AgencyPatch,
) -> Result<Agency, StoreError> {
    store
        .modify(id, |agency: &mut Agency| agency.apply(patch))
        .await
}

/// Delete an agency and every project that belongs to it.
///
/// Returns the removed agency and the number of projects removed with it.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if no agency has `id`.
///
/// Projects are written before the agency, so a failed second write leaves
/// the agency in place with no projects and the delete can simply be retried.
pub async fn delete_agency(store: &JsonStore, id: Uuid) -> Result<(Agency, usize), StoreError> {
    let _guard = store.lock().await;
    ensure_agency(store, id).await?;

    let mut projects = store.read_all::<Project>().await?;
    let before = projects.len();
    projects.retain(|p| p.agency_id != id);
    let removed = before - projects.len();
    if removed > 0 {
        store.write_all(&projects).await?;
    }

    let agency = store.remove_locked::<Agency>(id).await?;

    tracing::info!(agency_id = %id, projects_removed = removed, "agency deleted");
    Ok((agency, removed))
}

/// Projects for one agency ordered by creation time.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if the agency does not exist.
pub async fn list_projects(store: &JsonStore, agency_id: Uuid) -> Result<Vec<Project>, StoreError> {
    let _guard = store.lock().await;
    ensure_agency(store, agency_id).await?;
    let mut projects: Vec<Project> = store
        .read_all::<Project>()
        .await?
        .into_iter()
        .filter(|p| p.agency_id == agency_id)
        .collect();
    projects.sort_by_key(|p| p.created_at);
    Ok(projects)
}

/// # Errors
///
/// Returns [`StoreError::NotFound`] if the agency does not exist, or
/// [`StoreError::Validation`] for an invalid payload.
pub async fn create_project(
    store: &JsonStore,
    agency_id: Uuid,
    new: NewProject,
) -> Result<Project, StoreError> {
    let project = Project::from_new(agency_id, new)?;

    let _guard = store.lock().await;
    ensure_agency(store, agency_id).await?;
    let mut projects = store.read_all::<Project>().await?;
    projects.push(project.clone());
    store.write_all(&projects).await?;

    tracing::info!(
        agency_id = %agency_id,
        project_id = %project.id,
        name = %project.name,
        "project created"
    );
    Ok(project)
}

async fn ensure_agency(store: &JsonStore, agency_id: Uuid) -> Result<(), StoreError> {
    let agencies = store.read_all::<Agency>().await?;
    if agencies.iter().any(|a| a.id == agency_id) {
        Ok(())
    } else {
        Err(StoreError::NotFound)
    }
}
