//! Project document endpoints.
//!
//! This module covers link-type documents (external URLs shared with the
//! client). Upload-type documents are created by the multipart endpoint in
//! [`crate::api::handlers::uploads`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgConnection;

use crate::api::handlers::projects::load_owned_project;
use crate::api::models::accounts::CurrentAccount;
use crate::api::models::documents::{DocumentKind, DocumentLinkCreate, DocumentResponse};
use crate::db::handlers::Documents;
use crate::db::models::documents::{DocumentCreateDBRequest, DocumentDBResponse, DocumentFilter};
use crate::errors::{Error, Result};
use crate::types::{DocumentId, ProjectId};
use crate::AppState;

/// Load a document and verify it belongs to the given project.
async fn load_project_document(conn: &mut PgConnection, project_id: ProjectId, document_id: DocumentId) -> Result<DocumentDBResponse> {
    let document = Documents::new(conn).get_by_id(document_id).await?;
    match document {
        Some(d) if d.project_id == project_id => Ok(d),
        _ => Err(Error::NotFound {
            resource: "Document".to_string(),
            id: document_id.to_string(),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/projects/{project_id}/documents",
    tag = "documents",
    summary = "List documents on a project",
    params(("project_id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "List of documents", body = Vec<DocumentResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_documents(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<DocumentResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let documents = Documents::new(&mut conn)
        .list(&DocumentFilter {
            project_id: Some(project_id),
        })
        .await?;
    Ok(Json(documents.into_iter().map(DocumentResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/projects/{project_id}/documents",
    tag = "documents",
    summary = "Add a link-type document to a project",
    params(("project_id" = String, Path, description = "Project ID")),
    request_body = DocumentLinkCreate,
    responses(
        (status = 201, description = "Document created", body = DocumentResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_document(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<DocumentLinkCreate>,
) -> Result<(StatusCode, Json<DocumentResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let document = Documents::new(&mut conn)
        .create(&DocumentCreateDBRequest {
            project_id,
            kind: DocumentKind::Link,
            name: body.name,
            description: body.description,
            url: body.url,
            mime_type: None,
            size_bytes: None,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}

#[utoipa::path(
    get,
    path = "/projects/{project_id}/documents/{document_id}",
    tag = "documents",
    summary = "Get a document",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("document_id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document", body = DocumentResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or document not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_document(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, document_id)): Path<(ProjectId, DocumentId)>,
) -> Result<Json<DocumentResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;
    let document = load_project_document(&mut conn, project_id, document_id).await?;
    Ok(Json(DocumentResponse::from(document)))
}

#[utoipa::path(
    delete,
    path = "/projects/{project_id}/documents/{document_id}",
    tag = "documents",
    summary = "Delete a document",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("document_id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or document not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_document(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, document_id)): Path<(ProjectId, DocumentId)>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;
    load_project_document(&mut conn, project_id, document_id).await?;
    Documents::new(&mut conn).delete(document_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
