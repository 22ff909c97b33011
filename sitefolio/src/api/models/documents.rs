//! API request/response models for project documents.

use crate::db::models::documents::DocumentDBResponse;
use crate::types::{DocumentId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether a document is a stored upload or an external link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "document_kind", rename_all = "UPPERCASE")]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Upload,
    Link,
}

/// Create a link-type document.
///
/// Upload-type documents go through the multipart upload endpoint instead,
/// which fills in url, mime type, and size from the uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentLinkCreate {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: DocumentId,
    #[schema(value_type = String, format = "uuid")]
    pub project_id: ProjectId,
    pub kind: DocumentKind,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentDBResponse> for DocumentResponse {
    fn from(db: DocumentDBResponse) -> Self {
        Self {
            id: db.id,
            project_id: db.project_id,
            kind: db.kind,
            name: db.name,
            description: db.description,
            url: db.url,
            mime_type: db.mime_type,
            size_bytes: db.size_bytes,
            created_at: db.created_at,
        }
    }
}
