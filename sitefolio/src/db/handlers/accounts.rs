//! Database repository for builder accounts.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    api::models::accounts::SubscriptionStatus,
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::accounts::{
            AccountCreateDBRequest, AccountDBResponse, AccountFilter, AccountUpdateDBRequest, SubscriptionStateDBRequest,
        },
    },
    types::{AccountId, abbrev_uuid},
};

pub struct Accounts<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Accounts<'c> {
    type CreateRequest = AccountCreateDBRequest;
    type UpdateRequest = AccountUpdateDBRequest;
    type Response = AccountDBResponse;
    type Id = AccountId;
    type Filter = AccountFilter;

    #[instrument(skip(self, request), fields(external_user_id = %request.external_user_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let account = sqlx::query_as!(
            AccountDBResponse,
            r#"
            INSERT INTO accounts (external_user_id, email, name, project_limit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, external_user_id, email, name, company_id,
                      stripe_customer_id, stripe_subscription_id, stripe_price_id,
                      subscription_status AS "subscription_status: _",
                      current_period_end, project_limit, created_at, updated_at
            "#,
            request.external_user_id,
            request.email,
            request.name,
            request.project_limit
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(account)
    }

    #[instrument(skip(self, id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let account = sqlx::query_as!(
            AccountDBResponse,
            r#"
            SELECT id, external_user_id, email, name, company_id,
                   stripe_customer_id, stripe_subscription_id, stripe_price_id,
                   subscription_status AS "subscription_status: _",
                   current_period_end, project_limit, created_at, updated_at
            FROM accounts WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(account)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let accounts = sqlx::query_as!(
            AccountDBResponse,
            r#"
            SELECT id, external_user_id, email, name, company_id,
                   stripe_customer_id, stripe_subscription_id, stripe_price_id,
                   subscription_status AS "subscription_status: _",
                   current_period_end, project_limit, created_at, updated_at
            FROM accounts
            WHERE ($1::subscription_status IS NULL OR subscription_status = $1)
            ORDER BY created_at DESC
            "#,
            filter.subscription_status.clone() as Option<SubscriptionStatus>
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(accounts)
    }

    #[instrument(skip(self, id, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let account = sqlx::query_as!(
            AccountDBResponse,
            r#"
            UPDATE accounts
            SET email = COALESCE($2, email),
                name = COALESCE($3, name),
                company_id = COALESCE($4, company_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, external_user_id, email, name, company_id,
                      stripe_customer_id, stripe_subscription_id, stripe_price_id,
                      subscription_status AS "subscription_status: _",
                      current_period_end, project_limit, created_at, updated_at
            "#,
            id,
            request.email,
            request.name,
            request.company_id
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(account)
    }

    #[instrument(skip(self, id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query!("DELETE FROM accounts WHERE id = $1", id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl<'c> Accounts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Look up an account by its identity-provider subject
    #[instrument(skip(self, external_user_id), err)]
    pub async fn get_by_external_user_id(&mut self, external_user_id: &str) -> Result<Option<AccountDBResponse>> {
        let account = sqlx::query_as!(
            AccountDBResponse,
            r#"
            SELECT id, external_user_id, email, name, company_id,
                   stripe_customer_id, stripe_subscription_id, stripe_price_id,
                   subscription_status AS "subscription_status: _",
                   current_period_end, project_limit, created_at, updated_at
            FROM accounts WHERE external_user_id = $1
            "#,
            external_user_id
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(account)
    }

    /// Look up an account by the payments provider's customer id
    #[instrument(skip(self, customer_id), err)]
    pub async fn get_by_stripe_customer_id(&mut self, customer_id: &str) -> Result<Option<AccountDBResponse>> {
        let account = sqlx::query_as!(
            AccountDBResponse,
            r#"
            SELECT id, external_user_id, email, name, company_id,
                   stripe_customer_id, stripe_subscription_id, stripe_price_id,
                   subscription_status AS "subscription_status: _",
                   current_period_end, project_limit, created_at, updated_at
            FROM accounts WHERE stripe_customer_id = $1
            "#,
            customer_id
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(account)
    }

    /// Idempotent provisioning from identity-provider `user.created` events:
    /// redelivery updates the profile fields instead of failing on the unique
    /// subject constraint.
    #[instrument(skip(self, request), fields(external_user_id = %request.external_user_id), err)]
    pub async fn upsert_by_external_user_id(&mut self, request: &AccountCreateDBRequest) -> Result<AccountDBResponse> {
        let account = sqlx::query_as!(
            AccountDBResponse,
            r#"
            INSERT INTO accounts (external_user_id, email, name, project_limit)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (external_user_id)
            DO UPDATE SET email = EXCLUDED.email, name = EXCLUDED.name, updated_at = NOW()
            RETURNING id, external_user_id, email, name, company_id,
                      stripe_customer_id, stripe_subscription_id, stripe_price_id,
                      subscription_status AS "subscription_status: _",
                      current_period_end, project_limit, created_at, updated_at
            "#,
            request.external_user_id,
            request.email,
            request.name,
            request.project_limit
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(account)
    }

    /// Delete an account by its identity-provider subject
    #[instrument(skip(self, external_user_id), err)]
    pub async fn delete_by_external_user_id(&mut self, external_user_id: &str) -> Result<bool> {
        let result = sqlx::query!("DELETE FROM accounts WHERE external_user_id = $1", external_user_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Save a newly minted payments-provider customer id on the account
    #[instrument(skip(self, customer_id), fields(account_id = %abbrev_uuid(&id)), err)]
    pub async fn set_stripe_customer_id(&mut self, id: AccountId, customer_id: &str) -> Result<()> {
        sqlx::query!(
            "UPDATE accounts SET stripe_customer_id = $2, updated_at = NOW() WHERE id = $1",
            id,
            customer_id
        )
        .execute(&mut *self.db)
        .await?;

        Ok(())
    }

    /// Overwrite the subscription columns for the account owning the given
    /// customer id. Returns None when no account carries that customer id,
    /// which callers treat as ignorable (stale or foreign webhook).
    #[instrument(skip(self, customer_id, state), err)]
    pub async fn apply_subscription_state(
        &mut self,
        customer_id: &str,
        state: &SubscriptionStateDBRequest,
    ) -> Result<Option<AccountDBResponse>> {
        let account = sqlx::query_as!(
            AccountDBResponse,
            r#"
            UPDATE accounts
            SET stripe_subscription_id = $2,
                stripe_price_id = $3,
                subscription_status = $4,
                current_period_end = $5,
                project_limit = $6,
                updated_at = NOW()
            WHERE stripe_customer_id = $1
            RETURNING id, external_user_id, email, name, company_id,
                      stripe_customer_id, stripe_subscription_id, stripe_price_id,
                      subscription_status AS "subscription_status: _",
                      current_period_end, project_limit, created_at, updated_at
            "#,
            customer_id,
            state.stripe_subscription_id.as_deref(),
            state.stripe_price_id.as_deref(),
            state.subscription_status.clone() as SubscriptionStatus,
            state.current_period_end,
            state.project_limit
        )
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(account)
    }
}
