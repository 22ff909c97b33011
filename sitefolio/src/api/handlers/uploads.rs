//! Multipart file upload endpoints.
//!
//! Uploaded bytes are streamed into memory with an incremental size check
//! against the configured cap, then forwarded to object storage. Only after
//! the file is stored does a photo or document row get created, so a failed
//! upload never leaves a dangling database record.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::BytesMut;

use crate::api::handlers::projects::load_owned_project;
use crate::api::models::accounts::CurrentAccount;
use crate::api::models::documents::{DocumentKind, DocumentResponse};
use crate::api::models::photos::PhotoResponse;
use crate::db::handlers::{Documents, Photos, Reports, Repository};
use crate::db::models::documents::DocumentCreateDBRequest;
use crate::db::models::photos::PhotoCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::{ProjectId, ReportId};
use crate::AppState;

/// A fully-read multipart file field plus the accompanying text fields.
struct UploadedFile {
    filename: String,
    content_type: String,
    data: bytes::Bytes,
    text_fields: std::collections::HashMap<String, String>,
}

/// Drain a multipart body, enforcing the upload size cap as chunks arrive.
///
/// The cap is checked per chunk rather than after the fact, so an oversized
/// upload is rejected as soon as it crosses the limit instead of being
/// buffered in full first.
async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<UploadedFile> {
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data = BytesMut::new();
    let mut text_fields = std::collections::HashMap::new();

    while let Some(mut field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "file" {
            filename = field.file_name().map(|s| s.to_string());
            content_type = field.content_type().map(|s| s.to_string());

            while let Some(chunk) = field.chunk().await.map_err(|e| Error::BadRequest {
                message: format!("Failed to read file chunk: {e}"),
            })? {
                if data.len() + chunk.len() > max_bytes {
                    tracing::warn!(
                        received = data.len() + chunk.len(),
                        max_bytes,
                        "Upload exceeded size cap, aborting"
                    );
                    return Err(Error::PayloadTooLarge { max_bytes });
                }
                data.extend_from_slice(&chunk);
            }
        } else {
            let value = field.text().await.map_err(|e| Error::BadRequest {
                message: format!("Failed to read field '{field_name}': {e}"),
            })?;
            text_fields.insert(field_name, value);
        }
    }

    if data.is_empty() {
        return Err(Error::BadRequest {
            message: "Multipart body must include a non-empty 'file' field".to_string(),
        });
    }

    let filename = filename.unwrap_or_else(|| "upload".to_string());
    let content_type = content_type.unwrap_or_else(|| {
        mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });

    Ok(UploadedFile {
        filename,
        content_type,
        data: data.freeze(),
        text_fields,
    })
}

#[utoipa::path(
    post,
    path = "/projects/{project_id}/photos/upload",
    tag = "photos",
    summary = "Upload a photo file",
    description = "Multipart upload with a 'file' field and optional 'caption' and 'report_id' text fields.",
    params(("project_id" = String, Path, description = "Project ID")),
    request_body(content_type = "multipart/form-data", description = "Photo file upload"),
    responses(
        (status = 201, description = "Photo stored and attached", body = PhotoResponse),
        (status = 400, description = "Invalid multipart body"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or report not found"),
        (status = 413, description = "File exceeds the upload size cap"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn upload_photo(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PhotoResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let upload = read_upload(multipart, state.config.media.max_upload_bytes).await?;

    let report_id = match upload.text_fields.get("report_id") {
        Some(raw) => {
            let id: ReportId = raw.parse().map_err(|_| Error::BadRequest {
                message: format!("Invalid report_id: {raw}"),
            })?;
            let report = Reports::new(&mut conn).get_by_id(id).await?;
            match report {
                Some(r) if r.project_id == project_id => Some(id),
                _ => {
                    return Err(Error::NotFound {
                        resource: "Report".to_string(),
                        id: id.to_string(),
                    });
                }
            }
        }
        None => None,
    };

    let url = state
        .media
        .store(project_id, &upload.filename, &upload.content_type, upload.data)
        .await?;

    let photo = Photos::new(&mut conn)
        .create(&PhotoCreateDBRequest {
            project_id,
            report_id,
            url,
            caption: upload.text_fields.get("caption").cloned(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(PhotoResponse::from(photo))))
}

#[utoipa::path(
    post,
    path = "/projects/{project_id}/documents/upload",
    tag = "documents",
    summary = "Upload a document file",
    description = "Multipart upload with a 'file' field and optional 'name' and 'description' text fields.",
    params(("project_id" = String, Path, description = "Project ID")),
    request_body(content_type = "multipart/form-data", description = "Document file upload"),
    responses(
        (status = 201, description = "Document stored", body = DocumentResponse),
        (status = 400, description = "Invalid multipart body"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 413, description = "File exceeds the upload size cap"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn upload_document(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let upload = read_upload(multipart, state.config.media.max_upload_bytes).await?;
    let size_bytes = upload.data.len() as i64;

    let url = state
        .media
        .store(project_id, &upload.filename, &upload.content_type, upload.data)
        .await?;

    let name = upload
        .text_fields
        .get("name")
        .cloned()
        .unwrap_or_else(|| upload.filename.clone());

    let document = Documents::new(&mut conn)
        .create(&DocumentCreateDBRequest {
            project_id,
            kind: DocumentKind::Upload,
            name,
            description: upload.text_fields.get("description").cloned(),
            url,
            mime_type: Some(upload.content_type),
            size_bytes: Some(size_bytes),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}
