//! Photo attachment endpoints.
//!
//! These endpoints attach already-stored photo URLs to a project, optionally
//! pinned to a specific report. Raw file uploads go through the
//! [`crate::api::handlers::uploads`] endpoints, which store bytes in object
//! storage before creating the photo row.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::PgConnection;

use crate::api::handlers::projects::load_owned_project;
use crate::api::models::accounts::CurrentAccount;
use crate::api::models::photos::{ListPhotosQuery, PhotoCreate, PhotoResponse};
use crate::db::handlers::{Photos, Reports, Repository};
use crate::db::models::photos::{PhotoCreateDBRequest, PhotoFilter};
use crate::errors::{Error, Result};
use crate::types::{PhotoId, ProjectId, ReportId};
use crate::AppState;

/// Verify a report referenced by a photo belongs to the project.
async fn ensure_report_in_project(conn: &mut PgConnection, project_id: ProjectId, report_id: ReportId) -> Result<()> {
    let report = Reports::new(conn).get_by_id(report_id).await?;
    match report {
        Some(r) if r.project_id == project_id => Ok(()),
        _ => Err(Error::NotFound {
            resource: "Report".to_string(),
            id: report_id.to_string(),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/projects/{project_id}/photos",
    tag = "photos",
    summary = "List photos on a project",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ListPhotosQuery
    ),
    responses(
        (status = 200, description = "List of photos", body = Vec<PhotoResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_photos(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
    Query(query): Query<ListPhotosQuery>,
) -> Result<Json<Vec<PhotoResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let photos = Photos::new(&mut conn)
        .list(&PhotoFilter {
            project_id: Some(project_id),
            report_id: query.report_id,
        })
        .await?;
    Ok(Json(photos.into_iter().map(PhotoResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/projects/{project_id}/photos",
    tag = "photos",
    summary = "Attach a photo to a project",
    params(("project_id" = String, Path, description = "Project ID")),
    request_body = PhotoCreate,
    responses(
        (status = 201, description = "Photo attached", body = PhotoResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or report not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_photo(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<PhotoCreate>,
) -> Result<(StatusCode, Json<PhotoResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    if let Some(report_id) = body.report_id {
        ensure_report_in_project(&mut conn, project_id, report_id).await?;
    }

    let photo = Photos::new(&mut conn)
        .create(&PhotoCreateDBRequest {
            project_id,
            report_id: body.report_id,
            url: body.url,
            caption: body.caption,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(PhotoResponse::from(photo))))
}

#[utoipa::path(
    delete,
    path = "/projects/{project_id}/photos/{photo_id}",
    tag = "photos",
    summary = "Delete a photo",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("photo_id" = String, Path, description = "Photo ID")
    ),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or photo not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_photo(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, photo_id)): Path<(ProjectId, PhotoId)>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    // A photo on another project reads as not found
    let photo = Photos::new(&mut conn).get_by_id(photo_id).await?;
    match photo {
        Some(p) if p.project_id == project_id => {}
        _ => {
            return Err(Error::NotFound {
                resource: "Photo".to_string(),
                id: photo_id.to_string(),
            });
        }
    }

    Photos::new(&mut conn).delete(photo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
