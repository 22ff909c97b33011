//! Construction project endpoints.
//!
//! All project access is scoped to the authenticated builder account. A
//! project belonging to a different account is reported as not found rather
//! than forbidden, so project IDs cannot be probed across tenants.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgConnection;

use crate::api::models::accounts::CurrentAccount;
use crate::api::models::projects::{ProjectCreate, ProjectResponse, ProjectUpdate};
use crate::db::handlers::{Projects, Repository};
use crate::db::models::projects::{ProjectCreateDBRequest, ProjectDBResponse, ProjectFilter, ProjectUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::ProjectId;
use crate::AppState;

/// Load a project and verify it belongs to the given account.
///
/// Returns `NotFound` both for nonexistent projects and for projects owned by
/// another account.
pub(crate) async fn load_owned_project(
    conn: &mut PgConnection,
    account: &CurrentAccount,
    project_id: ProjectId,
) -> Result<ProjectDBResponse> {
    let project = Projects::new(conn).get_by_id(project_id).await?;
    match project {
        Some(p) if p.account_id == account.id => Ok(p),
        _ => Err(Error::NotFound {
            resource: "Project".to_string(),
            id: project_id.to_string(),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/projects",
    tag = "projects",
    summary = "List the account's projects",
    responses(
        (status = 200, description = "List of projects", body = Vec<ProjectResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_projects(State(state): State<AppState>, account: CurrentAccount) -> Result<Json<Vec<ProjectResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let projects = Projects::new(&mut conn)
        .list(&ProjectFilter {
            account_id: Some(account.id),
        })
        .await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/projects",
    tag = "projects",
    summary = "Create a project",
    request_body = ProjectCreate,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Plan project limit reached"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_project(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(body): Json<ProjectCreate>,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Projects::new(&mut conn);

    // NULL limit means unlimited; the gate only applies to numeric limits
    if let Some(limit) = account.project_limit {
        let count = repo.count_for_account(account.id).await?;
        if count >= limit as i64 {
            return Err(Error::PlanLimitReached { limit });
        }
    }

    let project = repo
        .create(&ProjectCreateDBRequest {
            account_id: account.id,
            name: body.name,
            address: body.address,
            city: body.city,
            state: body.state,
            postal_code: body.postal_code,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}

#[utoipa::path(
    get,
    path = "/projects/{project_id}",
    tag = "projects",
    summary = "Get a project",
    params(("project_id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_project(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<ProjectResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let project = load_owned_project(&mut conn, &account, project_id).await?;
    Ok(Json(ProjectResponse::from(project)))
}

#[utoipa::path(
    patch,
    path = "/projects/{project_id}",
    tag = "projects",
    summary = "Update a project",
    params(("project_id" = String, Path, description = "Project ID")),
    request_body = ProjectUpdate,
    responses(
        (status = 200, description = "Updated project", body = ProjectResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_project(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<ProjectUpdate>,
) -> Result<Json<ProjectResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let updated = Projects::new(&mut conn)
        .update(
            project_id,
            &ProjectUpdateDBRequest {
                name: body.name,
                address: body.address,
                city: body.city,
                state: body.state,
                postal_code: body.postal_code,
            },
        )
        .await?;
    Ok(Json(ProjectResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/projects/{project_id}",
    tag = "projects",
    summary = "Delete a project",
    params(("project_id" = String, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_project(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;
    Projects::new(&mut conn).delete(project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
