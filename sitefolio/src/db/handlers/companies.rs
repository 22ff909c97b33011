//! Database repository for branding companies.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::companies::{CompanyCreateDBRequest, CompanyDBResponse, CompanyFilter, CompanyUpdateDBRequest},
    },
    types::CompanyId,
};

pub struct Companies<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Companies<'c> {
    type CreateRequest = CompanyCreateDBRequest;
    type UpdateRequest = CompanyUpdateDBRequest;
    type Response = CompanyDBResponse;
    type Id = CompanyId;
    type Filter = CompanyFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let company = sqlx::query_as!(
            CompanyDBResponse,
            r#"
            INSERT INTO companies (name, logo_url, primary_color, secondary_color, accent_color)
            VALUES ($1, $2,
                    COALESCE($3, '#1f2937'),
                    COALESCE($4, '#f9fafb'),
                    COALESCE($5, '#d97706'))
            RETURNING id, name, logo_url, primary_color, secondary_color, accent_color, created_at, updated_at
            "#,
            request.name,
            request.logo_url,
            request.primary_color,
            request.secondary_color,
            request.accent_color
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(company)
    }

    #[instrument(skip(self, id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let company = sqlx::query_as!(
            CompanyDBResponse,
            r#"
            SELECT id, name, logo_url, primary_color, secondary_color, accent_color, created_at, updated_at
            FROM companies WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(company)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let companies = sqlx::query_as!(
            CompanyDBResponse,
            r#"
            SELECT id, name, logo_url, primary_color, secondary_color, accent_color, created_at, updated_at
            FROM companies ORDER BY created_at DESC
            "#
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(companies)
    }

    #[instrument(skip(self, id, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let company = sqlx::query_as!(
            CompanyDBResponse,
            r#"
            UPDATE companies
            SET name = COALESCE($2, name),
                logo_url = COALESCE($3, logo_url),
                primary_color = COALESCE($4, primary_color),
                secondary_color = COALESCE($5, secondary_color),
                accent_color = COALESCE($6, accent_color),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, logo_url, primary_color, secondary_color, accent_color, created_at, updated_at
            "#,
            id,
            request.name,
            request.logo_url,
            request.primary_color,
            request.secondary_color,
            request.accent_color
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(company)
    }

    #[instrument(skip(self, id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query!("DELETE FROM companies WHERE id = $1", id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Companies<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}
