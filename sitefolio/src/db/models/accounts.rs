//! Database models for builder accounts.

use crate::api::models::accounts::SubscriptionStatus;
use crate::types::{AccountId, CompanyId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct AccountDBResponse {
    pub id: AccountId,
    pub external_user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub company_id: Option<CompanyId>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub stripe_price_id: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    /// NULL means unlimited projects
    pub project_limit: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for provisioning an account from an identity-provider event
#[derive(Debug, Clone)]
pub struct AccountCreateDBRequest {
    pub external_user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub project_limit: Option<i32>,
}

/// Database request for updating account profile fields
#[derive(Debug, Clone, Default)]
pub struct AccountUpdateDBRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub company_id: Option<CompanyId>,
}

/// Overwrite of the subscription columns, applied from payments-provider webhooks.
///
/// Every field is written unconditionally so redelivered events re-apply the
/// same state (last write wins, no ordering guarantees).
#[derive(Debug, Clone)]
pub struct SubscriptionStateDBRequest {
    pub stripe_subscription_id: Option<String>,
    pub stripe_price_id: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    pub project_limit: Option<i32>,
}

/// Filter for listing accounts
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub subscription_status: Option<SubscriptionStatus>,
}
