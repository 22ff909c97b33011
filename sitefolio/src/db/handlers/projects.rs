//! Database repository for construction projects.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::projects::{ProjectCreateDBRequest, ProjectDBResponse, ProjectFilter, ProjectUpdateDBRequest},
    },
    types::{AccountId, ProjectId, abbrev_uuid},
};

pub struct Projects<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Projects<'c> {
    type CreateRequest = ProjectCreateDBRequest;
    type UpdateRequest = ProjectUpdateDBRequest;
    type Response = ProjectDBResponse;
    type Id = ProjectId;
    type Filter = ProjectFilter;

    #[instrument(skip(self, request), fields(account_id = %abbrev_uuid(&request.account_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let project = sqlx::query_as!(
            ProjectDBResponse,
            r#"
            INSERT INTO projects (account_id, name, address, city, state, postal_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_id, name, address, city, state, postal_code, created_at, updated_at
            "#,
            request.account_id,
            request.name,
            request.address,
            request.city,
            request.state,
            request.postal_code
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(project)
    }

    #[instrument(skip(self, id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let project = sqlx::query_as!(
            ProjectDBResponse,
            r#"
            SELECT id, account_id, name, address, city, state, postal_code, created_at, updated_at
            FROM projects WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(project)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let projects = sqlx::query_as!(
            ProjectDBResponse,
            r#"
            SELECT id, account_id, name, address, city, state, postal_code, created_at, updated_at
            FROM projects
            WHERE ($1::uuid IS NULL OR account_id = $1)
            ORDER BY created_at DESC
            "#,
            filter.account_id
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(projects)
    }

    #[instrument(skip(self, id, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let project = sqlx::query_as!(
            ProjectDBResponse,
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                city = COALESCE($4, city),
                state = COALESCE($5, state),
                postal_code = COALESCE($6, postal_code),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, account_id, name, address, city, state, postal_code, created_at, updated_at
            "#,
            id,
            request.name,
            request.address,
            request.city,
            request.state,
            request.postal_code
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(project)
    }

    #[instrument(skip(self, id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query!("DELETE FROM projects WHERE id = $1", id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Projects<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Count projects owned by an account, for plan-limit enforcement
    #[instrument(skip(self), fields(account_id = %abbrev_uuid(&account_id)), err)]
    pub async fn count_for_account(&mut self, account_id: AccountId) -> Result<i64> {
        let count = sqlx::query_scalar!(
            r#"SELECT COUNT(*) AS "count!" FROM projects WHERE account_id = $1"#,
            account_id
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }
}
