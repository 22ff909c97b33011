//! Weekly progress report endpoints.
//!
//! Reports start unpublished. Only explicitly published reports are visible
//! through the client portal; publish and unpublish are dedicated endpoints so
//! the flag can't flip as a side effect of a field edit.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgConnection;

use crate::api::handlers::projects::load_owned_project;
use crate::api::models::accounts::CurrentAccount;
use crate::api::models::photos::PhotoResponse;
use crate::api::models::reports::{ReportCreate, ReportResponse, ReportUpdate};
use crate::db::handlers::{Photos, Reports, Repository};
use crate::db::models::photos::PhotoFilter;
use crate::db::models::reports::{ReportCreateDBRequest, ReportDBResponse, ReportFilter, ReportUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::{ProjectId, ReportId};
use crate::AppState;

/// Load a report and verify it belongs to the given project.
async fn load_project_report(conn: &mut PgConnection, project_id: ProjectId, report_id: ReportId) -> Result<ReportDBResponse> {
    let report = Reports::new(conn).get_by_id(report_id).await?;
    match report {
        Some(r) if r.project_id == project_id => Ok(r),
        _ => Err(Error::NotFound {
            resource: "Report".to_string(),
            id: report_id.to_string(),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/projects/{project_id}/reports",
    tag = "reports",
    summary = "List reports on a project",
    params(("project_id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "List of reports", body = Vec<ReportResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_reports(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<ReportResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let reports = Reports::new(&mut conn)
        .list(&ReportFilter {
            project_id: Some(project_id),
            published: None,
        })
        .await?;
    Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/projects/{project_id}/reports",
    tag = "reports",
    summary = "Create a report",
    params(("project_id" = String, Path, description = "Project ID")),
    request_body = ReportCreate,
    responses(
        (status = 201, description = "Report created", body = ReportResponse),
        (status = 400, description = "Invalid week number"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "A report for this week already exists"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_report(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<ReportCreate>,
) -> Result<(StatusCode, Json<ReportResponse>)> {
    if !(1..=53).contains(&body.week) {
        return Err(Error::BadRequest {
            message: format!("Week must be between 1 and 53, got {}", body.week),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let report = Reports::new(&mut conn)
        .create(&ReportCreateDBRequest {
            project_id,
            week: body.week,
            year: body.year,
            summary: body.summary,
            work_completed: body.work_completed,
            upcoming_work: body.upcoming_work,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

#[utoipa::path(
    get,
    path = "/projects/{project_id}/reports/{report_id}",
    tag = "reports",
    summary = "Get a report with its photos",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("report_id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report", body = ReportResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or report not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_report(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, report_id)): Path<(ProjectId, ReportId)>,
) -> Result<Json<ReportResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;
    let report = load_project_report(&mut conn, project_id, report_id).await?;

    let photos = Photos::new(&mut conn)
        .list(&PhotoFilter {
            project_id: Some(project_id),
            report_id: Some(report_id),
        })
        .await?;

    let mut response = ReportResponse::from(report);
    response.photos = Some(photos.into_iter().map(PhotoResponse::from).collect());
    Ok(Json(response))
}

#[utoipa::path(
    patch,
    path = "/projects/{project_id}/reports/{report_id}",
    tag = "reports",
    summary = "Update a report's content",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("report_id" = String, Path, description = "Report ID")
    ),
    request_body = ReportUpdate,
    responses(
        (status = 200, description = "Updated report", body = ReportResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or report not found"),
        (status = 409, description = "A report for this week already exists"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_report(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, report_id)): Path<(ProjectId, ReportId)>,
    Json(body): Json<ReportUpdate>,
) -> Result<Json<ReportResponse>> {
    if let Some(week) = body.week
        && !(1..=53).contains(&week)
    {
        return Err(Error::BadRequest {
            message: format!("Week must be between 1 and 53, got {week}"),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;
    load_project_report(&mut conn, project_id, report_id).await?;

    let updated = Reports::new(&mut conn)
        .update(
            report_id,
            &ReportUpdateDBRequest {
                week: body.week,
                year: body.year,
                summary: body.summary,
                work_completed: body.work_completed,
                upcoming_work: body.upcoming_work,
                ..Default::default()
            },
        )
        .await?;
    Ok(Json(ReportResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/projects/{project_id}/reports/{report_id}",
    tag = "reports",
    summary = "Delete a report",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("report_id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or report not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_report(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, report_id)): Path<(ProjectId, ReportId)>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;
    load_project_report(&mut conn, project_id, report_id).await?;
    Reports::new(&mut conn).delete(report_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/projects/{project_id}/reports/{report_id}/publish",
    tag = "reports",
    summary = "Publish a report to the client portal",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("report_id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Published report", body = ReportResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or report not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn publish_report(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, report_id)): Path<(ProjectId, ReportId)>,
) -> Result<Json<ReportResponse>> {
    set_published(&state, &account, project_id, report_id, true).await
}

#[utoipa::path(
    post,
    path = "/projects/{project_id}/reports/{report_id}/unpublish",
    tag = "reports",
    summary = "Withdraw a report from the client portal",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("report_id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Unpublished report", body = ReportResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or report not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn unpublish_report(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, report_id)): Path<(ProjectId, ReportId)>,
) -> Result<Json<ReportResponse>> {
    set_published(&state, &account, project_id, report_id, false).await
}

async fn set_published(
    state: &AppState,
    account: &CurrentAccount,
    project_id: ProjectId,
    report_id: ReportId,
    published: bool,
) -> Result<Json<ReportResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, account, project_id).await?;
    load_project_report(&mut conn, project_id, report_id).await?;

    let updated = Reports::new(&mut conn)
        .update(
            report_id,
            &ReportUpdateDBRequest {
                published: Some(published),
                ..Default::default()
            },
        )
        .await?;
    Ok(Json(ReportResponse::from(updated)))
}
