//! Database repository for project documents.
//!
//! Documents are write-once (uploads and links are replaced, not edited), so
//! like photos this repository skips the update half of the CRUD surface.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    api::models::documents::DocumentKind,
    db::{
        errors::Result,
        models::documents::{DocumentCreateDBRequest, DocumentDBResponse, DocumentFilter},
    },
    types::{DocumentId, abbrev_uuid},
};

pub struct Documents<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Documents<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(project_id = %abbrev_uuid(&request.project_id)), err)]
    pub async fn create(&mut self, request: &DocumentCreateDBRequest) -> Result<DocumentDBResponse> {
        let document = sqlx::query_as!(
            DocumentDBResponse,
            r#"
            INSERT INTO documents (project_id, kind, name, description, url, mime_type, size_bytes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, project_id, kind AS "kind: _", name, description, url, mime_type, size_bytes, created_at
            "#,
            request.project_id,
            request.kind.clone() as DocumentKind,
            request.name,
            request.description,
            request.url,
            request.mime_type,
            request.size_bytes
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(document)
    }

    #[instrument(skip(self, id), err)]
    pub async fn get_by_id(&mut self, id: DocumentId) -> Result<Option<DocumentDBResponse>> {
        let document = sqlx::query_as!(
            DocumentDBResponse,
            r#"
            SELECT id, project_id, kind AS "kind: _", name, description, url, mime_type, size_bytes, created_at
            FROM documents WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(document)
    }

    #[instrument(skip(self, filter), err)]
    pub async fn list(&mut self, filter: &DocumentFilter) -> Result<Vec<DocumentDBResponse>> {
        let documents = sqlx::query_as!(
            DocumentDBResponse,
            r#"
            SELECT id, project_id, kind AS "kind: _", name, description, url, mime_type, size_bytes, created_at
            FROM documents
            WHERE ($1::uuid IS NULL OR project_id = $1)
            ORDER BY created_at DESC
            "#,
            filter.project_id
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(documents)
    }

    #[instrument(skip(self, id), err)]
    pub async fn delete(&mut self, id: DocumentId) -> Result<bool> {
        let result = sqlx::query!("DELETE FROM documents WHERE id = $1", id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
