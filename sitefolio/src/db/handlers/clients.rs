//! Database repository for homeowner clients.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    api::models::clients::ClientRelationship,
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::clients::{ClientCreateDBRequest, ClientDBResponse, ClientFilter, ClientUpdateDBRequest},
    },
    types::{ClientId, abbrev_uuid},
};

pub struct Clients<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Clients<'c> {
    type CreateRequest = ClientCreateDBRequest;
    type UpdateRequest = ClientUpdateDBRequest;
    type Response = ClientDBResponse;
    type Id = ClientId;
    type Filter = ClientFilter;

    #[instrument(skip(self, request), fields(project_id = %abbrev_uuid(&request.project_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let client = sqlx::query_as!(
            ClientDBResponse,
            r#"
            INSERT INTO clients (project_id, first_name, last_name, email, phone, relationship)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, project_id, first_name, last_name, email, phone,
                      relationship AS "relationship: _",
                      invited, password_hash, created_at, updated_at
            "#,
            request.project_id,
            request.first_name,
            request.last_name,
            request.email,
            request.phone,
            request.relationship.clone() as ClientRelationship
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(client)
    }

    #[instrument(skip(self, id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let client = sqlx::query_as!(
            ClientDBResponse,
            r#"
            SELECT id, project_id, first_name, last_name, email, phone,
                   relationship AS "relationship: _",
                   invited, password_hash, created_at, updated_at
            FROM clients WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(client)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let clients = sqlx::query_as!(
            ClientDBResponse,
            r#"
            SELECT id, project_id, first_name, last_name, email, phone,
                   relationship AS "relationship: _",
                   invited, password_hash, created_at, updated_at
            FROM clients
            WHERE ($1::uuid IS NULL OR project_id = $1)
              AND ($2::text IS NULL OR email = $2)
            ORDER BY created_at ASC
            "#,
            filter.project_id,
            filter.email
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(clients)
    }

    #[instrument(skip(self, id, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let client = sqlx::query_as!(
            ClientDBResponse,
            r#"
            UPDATE clients
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                relationship = COALESCE($5, relationship),
                invited = COALESCE($6, invited),
                password_hash = COALESCE($7, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, project_id, first_name, last_name, email, phone,
                      relationship AS "relationship: _",
                      invited, password_hash, created_at, updated_at
            "#,
            id,
            request.first_name,
            request.last_name,
            request.phone,
            request.relationship.clone() as Option<ClientRelationship>,
            request.invited,
            request.password_hash
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(client)
    }

    #[instrument(skip(self, id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query!("DELETE FROM clients WHERE id = $1", id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Clients<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Find a client by portal email address.
    ///
    /// Emails are unique per project but not globally; the portal login flow
    /// takes the most recently added match, which mirrors how invitations are
    /// issued.
    #[instrument(skip(self, email), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<ClientDBResponse>> {
        let client = sqlx::query_as!(
            ClientDBResponse,
            r#"
            SELECT id, project_id, first_name, last_name, email, phone,
                   relationship AS "relationship: _",
                   invited, password_hash, created_at, updated_at
            FROM clients WHERE email = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            email
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(client)
    }
}
