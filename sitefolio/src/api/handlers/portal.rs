//! Read-only project view for authenticated portal clients.
//!
//! A client session is scoped to exactly one project. The portal never
//! exposes unpublished reports, other clients, or anything about the
//! builder's account beyond company branding.

use axum::{extract::State, Json};

use crate::api::models::clients::CurrentClient;
use crate::api::models::companies::CompanyResponse;
use crate::api::models::documents::DocumentResponse;
use crate::api::models::photos::PhotoResponse;
use crate::api::models::portal::PortalProjectResponse;
use crate::api::models::projects::ProjectResponse;
use crate::api::models::reports::ReportResponse;
use crate::db::handlers::{Accounts, Companies, Documents, Photos, Projects, Reports, Repository};
use crate::db::models::documents::DocumentFilter;
use crate::db::models::photos::PhotoFilter;
use crate::db::models::reports::ReportFilter;
use crate::errors::{Error, Result};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/project",
    tag = "portal",
    summary = "Get the client's project with branding, published reports, and documents",
    responses(
        (status = 200, description = "Portal project view", body = PortalProjectResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project no longer exists"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_project(State(state): State<AppState>, client: CurrentClient) -> Result<Json<PortalProjectResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let project = Projects::new(&mut conn)
        .get_by_id(client.project_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Project".to_string(),
            id: client.project_id.to_string(),
        })?;

    // Branding comes from the owning builder's company, when configured
    let account = Accounts::new(&mut conn).get_by_id(project.account_id).await?;
    let company = match account.and_then(|a| a.company_id) {
        Some(company_id) => Companies::new(&mut conn).get_by_id(company_id).await?.map(CompanyResponse::from),
        None => None,
    };

    // Published reports only, each carrying its attached photos
    let report_rows = Reports::new(&mut conn)
        .list(&ReportFilter {
            project_id: Some(client.project_id),
            published: Some(true),
        })
        .await?;

    let mut reports = Vec::with_capacity(report_rows.len());
    for row in report_rows {
        let report_id = row.id;
        let mut report = ReportResponse::from(row);
        let photos = Photos::new(&mut conn)
            .list(&PhotoFilter {
                project_id: Some(client.project_id),
                report_id: Some(report_id),
            })
            .await?;
        report.photos = Some(photos.into_iter().map(PhotoResponse::from).collect());
        reports.push(report);
    }

    let documents = Documents::new(&mut conn)
        .list(&DocumentFilter {
            project_id: Some(client.project_id),
        })
        .await?;

    Ok(Json(PortalProjectResponse {
        project: ProjectResponse::from(project),
        company,
        reports,
        documents: documents.into_iter().map(DocumentResponse::from).collect(),
    }))
}
