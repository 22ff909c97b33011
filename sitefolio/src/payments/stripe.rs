//! Stripe payment provider implementation

use async_trait::async_trait;
use sqlx::PgPool;
use stripe::{
    CheckoutSession, CheckoutSessionMode, CheckoutSessionUiMode, Client, CreateBillingPortalSession, CreateCheckoutSession,
    CreateCheckoutSessionLineItems,
};

use crate::{
    api::models::accounts::{CurrentAccount, SubscriptionStatus},
    config::StripeConfig,
    db::handlers::Accounts,
    payments::{PaymentError, PaymentProvider, Result, SubscriptionEvent},
};

/// Stripe payment provider
pub struct StripeProvider {
    api_key: String,
    webhook_secret: String,
}

impl StripeProvider {
    pub fn new(api_key: String, webhook_secret: String) -> Self {
        Self { api_key, webhook_secret }
    }

    fn client(&self) -> Client {
        Client::new(&self.api_key)
    }
}

impl From<StripeConfig> for StripeProvider {
    fn from(config: StripeConfig) -> Self {
        Self::new(config.api_key, config.webhook_secret)
    }
}

/// Map Stripe's subscription status onto the local enum.
fn map_subscription_status(status: stripe::SubscriptionStatus) -> SubscriptionStatus {
    match status {
        stripe::SubscriptionStatus::Trialing => SubscriptionStatus::Trialing,
        stripe::SubscriptionStatus::Active => SubscriptionStatus::Active,
        stripe::SubscriptionStatus::PastDue => SubscriptionStatus::PastDue,
        stripe::SubscriptionStatus::Canceled | stripe::SubscriptionStatus::Unpaid | stripe::SubscriptionStatus::Paused => {
            SubscriptionStatus::Canceled
        }
        stripe::SubscriptionStatus::Incomplete | stripe::SubscriptionStatus::IncompleteExpired => SubscriptionStatus::Incomplete,
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    async fn create_checkout_session(
        &self,
        db_pool: &PgPool,
        account: &CurrentAccount,
        price_id: &str,
        cancel_url: &str,
        success_url: &str,
    ) -> Result<String> {
        let client = self.client();

        let account_reference = account.id.to_string();
        let mut checkout_params = CreateCheckoutSession {
            cancel_url: Some(cancel_url),
            success_url: Some(success_url),
            client_reference_id: Some(&account_reference),
            line_items: Some(vec![CreateCheckoutSessionLineItems {
                price: Some(price_id.to_string()),
                quantity: Some(1),
                ..Default::default()
            }]),
            mode: Some(CheckoutSessionMode::Subscription),
            ui_mode: Some(CheckoutSessionUiMode::Hosted),
            ..Default::default()
        };

        // Reuse the customer record if one exists from a previous checkout
        if let Some(existing_id) = &account.stripe_customer_id {
            tracing::info!("Using existing Stripe customer ID {} for account {}", existing_id, account.id);
            checkout_params.customer = Some(
                existing_id
                    .parse()
                    .map_err(|_| PaymentError::InvalidData("Stored customer ID is not a valid Stripe ID".to_string()))?,
            );
        } else {
            tracing::info!("No customer ID found for account {}, Stripe will create one", account.id);
            checkout_params.customer_email = Some(&account.email);
        }

        let checkout_session = CheckoutSession::create(&client, checkout_params).await.map_err(|e| {
            tracing::error!("Failed to create Stripe checkout session: {:?}", e);
            PaymentError::ProviderApi(e.to_string())
        })?;

        tracing::info!("Created checkout session {} for account {}", checkout_session.id, account.id);

        // If we didn't have a customer ID before, save the newly created one
        if account.stripe_customer_id.is_none()
            && let Some(customer) = &checkout_session.customer
        {
            let customer_id = customer.id().to_string();
            tracing::trace!("Saving newly created customer ID {} for account {}", customer_id, account.id);

            let mut conn = db_pool.acquire().await?;
            let mut accounts = Accounts::new(&mut conn);
            accounts
                .set_stripe_customer_id(account.id, &customer_id)
                .await
                .map_err(|e| PaymentError::InvalidData(format!("Database error: {e}")))?;
        }

        checkout_session.url.ok_or_else(|| {
            tracing::error!("Checkout session missing URL");
            PaymentError::ProviderApi("Checkout session missing URL".to_string())
        })
    }

    async fn create_billing_portal_session(&self, account: &CurrentAccount, return_url: &str) -> Result<String> {
        let client = self.client();

        let customer_id = account
            .stripe_customer_id
            .as_ref()
            .ok_or(PaymentError::NoCustomerId)?
            .parse()
            .map_err(|_| PaymentError::InvalidData("Stored customer ID is not a valid Stripe ID".to_string()))?;

        let mut params = CreateBillingPortalSession::new(customer_id);
        params.return_url = Some(return_url);

        let session = stripe::BillingPortalSession::create(&client, params).await.map_err(|e| {
            tracing::error!("Failed to create Stripe billing portal session: {:?}", e);
            PaymentError::ProviderApi(e.to_string())
        })?;

        Ok(session.url)
    }

    fn parse_webhook(&self, headers: &axum::http::HeaderMap, body: &str) -> Result<Option<SubscriptionEvent>> {
        let signature = headers
            .get("stripe-signature")
            .ok_or_else(|| {
                tracing::warn!("Missing stripe-signature header");
                PaymentError::InvalidSignature("Missing stripe-signature header".to_string())
            })?
            .to_str()
            .map_err(|e| {
                tracing::warn!("Invalid stripe-signature header: {:?}", e);
                PaymentError::InvalidSignature("Invalid stripe-signature header".to_string())
            })?;

        // Signature verification happens here, before any event data is trusted
        let event = stripe::Webhook::construct_event(body, signature, &self.webhook_secret).map_err(|e| {
            tracing::warn!("Failed to verify webhook event: {:?}", e);
            PaymentError::InvalidSignature(format!("Webhook verification failed: {e}"))
        })?;

        tracing::trace!("Verified Stripe webhook event: {:?}", event.type_);

        let subscription_event = match event.type_ {
            stripe::EventType::CustomerSubscriptionCreated | stripe::EventType::CustomerSubscriptionUpdated => {
                let stripe::EventObject::Subscription(subscription) = event.data.object else {
                    return Err(PaymentError::InvalidData("Subscription event without subscription object".to_string()));
                };

                SubscriptionEvent::Updated {
                    customer_id: subscription.customer.id().to_string(),
                    subscription_id: subscription.id.to_string(),
                    price_id: subscription
                        .items
                        .data
                        .first()
                        .and_then(|item| item.price.as_ref())
                        .map(|price| price.id.to_string()),
                    status: map_subscription_status(subscription.status),
                    current_period_end: chrono::DateTime::from_timestamp(subscription.current_period_end, 0),
                }
            }
            stripe::EventType::CustomerSubscriptionDeleted => {
                let stripe::EventObject::Subscription(subscription) = event.data.object else {
                    return Err(PaymentError::InvalidData("Subscription event without subscription object".to_string()));
                };

                SubscriptionEvent::Deleted {
                    customer_id: subscription.customer.id().to_string(),
                }
            }
            stripe::EventType::InvoicePaymentFailed => {
                let stripe::EventObject::Invoice(invoice) = event.data.object else {
                    return Err(PaymentError::InvalidData("Invoice event without invoice object".to_string()));
                };

                match invoice.customer {
                    Some(customer) => SubscriptionEvent::PaymentFailed {
                        customer_id: customer.id().to_string(),
                    },
                    None => SubscriptionEvent::Ignored {
                        event_type: "invoice.payment_failed (no customer)".to_string(),
                    },
                }
            }
            other => SubscriptionEvent::Ignored {
                event_type: format!("{other:?}"),
            },
        };

        Ok(Some(subscription_event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_provider_creation() {
        let provider = StripeProvider::new("sk_test_fake".to_string(), "whsec_fake".to_string());

        assert_eq!(provider.api_key, "sk_test_fake");
        assert_eq!(provider.webhook_secret, "whsec_fake");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(map_subscription_status(stripe::SubscriptionStatus::Active), SubscriptionStatus::Active);
        assert_eq!(map_subscription_status(stripe::SubscriptionStatus::Trialing), SubscriptionStatus::Trialing);
        assert_eq!(map_subscription_status(stripe::SubscriptionStatus::PastDue), SubscriptionStatus::PastDue);
        assert_eq!(map_subscription_status(stripe::SubscriptionStatus::Unpaid), SubscriptionStatus::Canceled);
        assert_eq!(
            map_subscription_status(stripe::SubscriptionStatus::IncompleteExpired),
            SubscriptionStatus::Incomplete
        );
    }

    #[test]
    fn test_missing_signature_rejected() {
        let provider = StripeProvider::new("sk_test_fake".to_string(), "whsec_fake".to_string());

        let headers = axum::http::HeaderMap::new();
        let result = provider.parse_webhook(&headers, "{}");

        assert!(matches!(result, Err(PaymentError::InvalidSignature(_))));
    }

    #[test]
    fn test_garbage_signature_rejected() {
        let provider = StripeProvider::new("sk_test_fake".to_string(), "whsec_fake".to_string());

        let mut headers = axum::http::HeaderMap::new();
        headers.insert("stripe-signature", "t=123,v1=deadbeef".parse().unwrap());
        let result = provider.parse_webhook(&headers, r#"{"id":"evt_123"}"#);

        assert!(matches!(result, Err(PaymentError::InvalidSignature(_))));
    }
}
