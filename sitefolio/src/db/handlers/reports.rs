//! Database repository for weekly progress reports.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::reports::{ReportCreateDBRequest, ReportDBResponse, ReportFilter, ReportUpdateDBRequest},
    },
    types::{ReportId, abbrev_uuid},
};

pub struct Reports<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Reports<'c> {
    type CreateRequest = ReportCreateDBRequest;
    type UpdateRequest = ReportUpdateDBRequest;
    type Response = ReportDBResponse;
    type Id = ReportId;
    type Filter = ReportFilter;

    #[instrument(skip(self, request), fields(project_id = %abbrev_uuid(&request.project_id), week = request.week, year = request.year), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let report = sqlx::query_as!(
            ReportDBResponse,
            r#"
            INSERT INTO reports (project_id, week, year, summary, work_completed, upcoming_work)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, project_id, week, year, published, summary, work_completed, upcoming_work, created_at, updated_at
            "#,
            request.project_id,
            request.week,
            request.year,
            request.summary,
            request.work_completed,
            request.upcoming_work
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(report)
    }

    #[instrument(skip(self, id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let report = sqlx::query_as!(
            ReportDBResponse,
            r#"
            SELECT id, project_id, week, year, published, summary, work_completed, upcoming_work, created_at, updated_at
            FROM reports WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(report)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let reports = sqlx::query_as!(
            ReportDBResponse,
            r#"
            SELECT id, project_id, week, year, published, summary, work_completed, upcoming_work, created_at, updated_at
            FROM reports
            WHERE ($1::uuid IS NULL OR project_id = $1)
              AND ($2::boolean IS NULL OR published = $2)
            ORDER BY year DESC, week DESC
            "#,
            filter.project_id,
            filter.published
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(reports)
    }

    #[instrument(skip(self, id, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let report = sqlx::query_as!(
            ReportDBResponse,
            r#"
            UPDATE reports
            SET week = COALESCE($2, week),
                year = COALESCE($3, year),
                published = COALESCE($4, published),
                summary = COALESCE($5, summary),
                work_completed = COALESCE($6, work_completed),
                upcoming_work = COALESCE($7, upcoming_work),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, project_id, week, year, published, summary, work_completed, upcoming_work, created_at, updated_at
            "#,
            id,
            request.week,
            request.year,
            request.published,
            request.summary,
            request.work_completed,
            request.upcoming_work
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(report)
    }

    #[instrument(skip(self, id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query!("DELETE FROM reports WHERE id = $1", id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Reports<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}
