//! Database models for project documents.

use crate::api::models::documents::DocumentKind;
use crate::types::{DocumentId, ProjectId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct DocumentDBResponse {
    pub id: DocumentId,
    pub project_id: ProjectId,
    pub kind: DocumentKind,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Database request for creating a document
#[derive(Debug, Clone)]
pub struct DocumentCreateDBRequest {
    pub project_id: ProjectId,
    pub kind: DocumentKind,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
}

/// Filter for listing documents
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub project_id: Option<ProjectId>,
}
