//! Database repository for single-use client portal tokens.
//!
//! Tokens are opaque random strings mailed to homeowners for first-time
//! password setup. They are time-boxed (24 hours by default) and single-use:
//! both expiry detection and consumption delete the row, so a token can never
//! authenticate twice.

use chrono::{Duration, Utc};
use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    auth::password,
    db::{
        errors::Result,
        models::client_tokens::{ClientToken, ClientTokenCreateRequest},
    },
    types::{ClientId, abbrev_uuid},
};

pub struct ClientTokens<'c> {
    db: &'c mut PgConnection,
}

impl<'c> ClientTokens<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Issue a fresh token for a client, returning the raw value for the
    /// invite email. Any previous tokens for the client are removed first so
    /// at most one is outstanding.
    #[instrument(skip(self, ttl), fields(client_id = %abbrev_uuid(&client_id)), err)]
    pub async fn create_for_client(&mut self, client_id: ClientId, ttl: std::time::Duration) -> Result<(String, ClientToken)> {
        sqlx::query!("DELETE FROM client_tokens WHERE client_id = $1", client_id)
            .execute(&mut *self.db)
            .await?;

        let request = ClientTokenCreateRequest {
            client_id,
            token: password::generate_portal_token(),
            expires_at: Utc::now() + Duration::from_std(ttl).unwrap_or(Duration::hours(24)),
        };

        let token = sqlx::query_as!(
            ClientToken,
            r#"
            INSERT INTO client_tokens (client_id, token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, client_id, token, expires_at, created_at
            "#,
            request.client_id,
            request.token,
            request.expires_at
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok((request.token, token))
    }

    /// Non-consuming validity check: true only for a known, unexpired token.
    /// An expired row is deleted on sight so it can never validate again.
    #[instrument(skip_all, err)]
    pub async fn validate(&mut self, raw_token: &str) -> Result<bool> {
        Ok(self.fetch_unexpired(raw_token).await?.is_some())
    }

    /// Consume a token: fetch it with the same expiry check as [`validate`],
    /// then delete every row carrying that value. Returns the client the
    /// token belonged to, or None if the token was unknown, expired, or
    /// already consumed.
    ///
    /// [`validate`]: ClientTokens::validate
    #[instrument(skip_all, err)]
    pub async fn consume(&mut self, raw_token: &str) -> Result<Option<ClientId>> {
        let Some(token) = self.fetch_unexpired(raw_token).await? else {
            return Ok(None);
        };

        sqlx::query!("DELETE FROM client_tokens WHERE token = $1", raw_token)
            .execute(&mut *self.db)
            .await?;

        Ok(Some(token.client_id))
    }

    /// Fetch a token row by value, deleting it (and reporting absence) when
    /// it has expired.
    async fn fetch_unexpired(&mut self, raw_token: &str) -> Result<Option<ClientToken>> {
        let token = sqlx::query_as!(
            ClientToken,
            "SELECT id, client_id, token, expires_at, created_at FROM client_tokens WHERE token = $1",
            raw_token
        )
        .fetch_optional(&mut *self.db)
        .await?;

        let Some(token) = token else {
            return Ok(None);
        };

        if Utc::now() > token.expires_at {
            sqlx::query!("DELETE FROM client_tokens WHERE id = $1", token.id)
                .execute(&mut *self.db)
                .await?;
            return Ok(None);
        }

        Ok(Some(token))
    }
}
