//! API request/response models for builder accounts.

use crate::db::models::accounts::AccountDBResponse;
use crate::types::{AccountId, CompanyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subscription lifecycle states mirrored from the payments provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trialing,
    Active,
    PastDue,
    Canceled,
    Incomplete,
}

/// The authenticated builder, loaded by the request extractor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentAccount {
    #[schema(value_type = String, format = "uuid")]
    pub id: AccountId,
    pub external_user_id: String,
    pub email: String,
    pub name: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub company_id: Option<CompanyId>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub stripe_price_id: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    /// NULL means unlimited projects
    pub project_limit: Option<i32>,
}

impl From<AccountDBResponse> for CurrentAccount {
    fn from(db: AccountDBResponse) -> Self {
        Self {
            id: db.id,
            external_user_id: db.external_user_id,
            email: db.email,
            name: db.name,
            company_id: db.company_id,
            stripe_customer_id: db.stripe_customer_id,
            stripe_subscription_id: db.stripe_subscription_id,
            stripe_price_id: db.stripe_price_id,
            subscription_status: db.subscription_status,
            current_period_end: db.current_period_end,
            project_limit: db.project_limit,
        }
    }
}

/// Account profile update request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountUpdate {
    pub name: Option<String>,
}

/// Account response model.
///
/// Provider customer/subscription ids stay server-side; the response exposes
/// only the subscription state the frontend needs to render billing status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: AccountId,
    pub email: String,
    pub name: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub company_id: Option<CompanyId>,
    pub subscription_status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    pub project_limit: Option<i32>,
    pub has_billing_profile: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountDBResponse> for AccountResponse {
    fn from(db: AccountDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email,
            name: db.name,
            company_id: db.company_id,
            subscription_status: db.subscription_status,
            current_period_end: db.current_period_end,
            project_limit: db.project_limit,
            has_billing_profile: db.stripe_customer_id.is_some(),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
