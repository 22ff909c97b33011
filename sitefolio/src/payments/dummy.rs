//! Dummy payment provider implementation
//!
//! This provider short-circuits checkout and billing portal redirects without
//! contacting any external service. Useful for testing and development.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    api::models::accounts::CurrentAccount,
    payments::{PaymentProvider, Result, SubscriptionEvent},
};

/// Dummy payment provider that "completes" checkout immediately
pub struct DummyProvider;

impl DummyProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for DummyProvider {
    async fn create_checkout_session(
        &self,
        _db_pool: &PgPool,
        account: &CurrentAccount,
        price_id: &str,
        _cancel_url: &str,
        success_url: &str,
    ) -> Result<String> {
        let session_id = format!("dummy_session_{}_{}", account.id, uuid::Uuid::new_v4());

        tracing::info!(
            "Dummy provider created checkout session {} for account {} (price {})",
            session_id,
            account.id,
            price_id
        );

        // Payment is instantly "complete" for the dummy provider
        Ok(success_url.replace("{CHECKOUT_SESSION_ID}", &session_id))
    }

    async fn create_billing_portal_session(&self, account: &CurrentAccount, return_url: &str) -> Result<String> {
        tracing::info!("Dummy provider returning billing portal redirect for account {}", account.id);
        Ok(return_url.to_string())
    }

    fn parse_webhook(&self, _headers: &axum::http::HeaderMap, _body: &str) -> Result<Option<SubscriptionEvent>> {
        // Dummy provider doesn't deliver webhooks
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::accounts::SubscriptionStatus;
    use crate::types::AccountId;

    fn test_account() -> CurrentAccount {
        CurrentAccount {
            id: AccountId::new_v4(),
            external_user_id: "ext_user_1".to_string(),
            email: "builder@example.com".to_string(),
            name: Some("Test Builder".to_string()),
            company_id: None,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            stripe_price_id: None,
            subscription_status: SubscriptionStatus::Trialing,
            current_period_end: None,
            project_limit: Some(1),
        }
    }

    #[tokio::test]
    async fn test_dummy_portal_redirects_to_return_url() {
        let provider = DummyProvider::new();
        let account = test_account();

        let url = provider
            .create_billing_portal_session(&account, "http://localhost:3210/app/billing")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3210/app/billing");
    }

    #[test]
    fn test_dummy_webhook_not_supported() {
        let provider = DummyProvider::new();

        let headers = axum::http::HeaderMap::new();
        let result = provider.parse_webhook(&headers, "{}").unwrap();

        assert!(result.is_none());
    }
}
