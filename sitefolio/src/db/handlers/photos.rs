//! Database repository for project and report photos.
//!
//! Photos are immutable once attached, so this repository only covers
//! create/list/delete rather than the full [`super::Repository`] surface.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::Result,
        models::photos::{PhotoCreateDBRequest, PhotoDBResponse, PhotoFilter},
    },
    types::{PhotoId, abbrev_uuid},
};

pub struct Photos<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Photos<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(project_id = %abbrev_uuid(&request.project_id)), err)]
    pub async fn create(&mut self, request: &PhotoCreateDBRequest) -> Result<PhotoDBResponse> {
        let photo = sqlx::query_as!(
            PhotoDBResponse,
            r#"
            INSERT INTO photos (project_id, report_id, url, caption)
            VALUES ($1, $2, $3, $4)
            RETURNING id, project_id, report_id, url, caption, created_at
            "#,
            request.project_id,
            request.report_id,
            request.url,
            request.caption
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(photo)
    }

    #[instrument(skip(self, id), err)]
    pub async fn get_by_id(&mut self, id: PhotoId) -> Result<Option<PhotoDBResponse>> {
        let photo = sqlx::query_as!(
            PhotoDBResponse,
            "SELECT id, project_id, report_id, url, caption, created_at FROM photos WHERE id = $1",
            id
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(photo)
    }

    #[instrument(skip(self, filter), err)]
    pub async fn list(&mut self, filter: &PhotoFilter) -> Result<Vec<PhotoDBResponse>> {
        let photos = sqlx::query_as!(
            PhotoDBResponse,
            r#"
            SELECT id, project_id, report_id, url, caption, created_at
            FROM photos
            WHERE ($1::uuid IS NULL OR project_id = $1)
              AND ($2::uuid IS NULL OR report_id = $2)
            ORDER BY created_at ASC
            "#,
            filter.project_id,
            filter.report_id
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(photos)
    }

    #[instrument(skip(self, id), err)]
    pub async fn delete(&mut self, id: PhotoId) -> Result<bool> {
        let result = sqlx::query!("DELETE FROM photos WHERE id = $1", id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
