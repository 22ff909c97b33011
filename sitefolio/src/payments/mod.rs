//! Payment provider abstraction layer
//!
//! This module defines the `PaymentProvider` trait which abstracts subscription
//! billing across different payment providers (Stripe, etc.).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    api::models::accounts::{CurrentAccount, SubscriptionStatus},
    config::PaymentProviderConfig,
};

pub mod dummy;
pub mod stripe;

/// Create a payment provider from configuration
///
/// This is the single point where we convert config into provider instances.
/// Adding a new provider requires adding a match arm here.
pub fn create_provider(config: PaymentProviderConfig) -> Box<dyn PaymentProvider> {
    match config {
        PaymentProviderConfig::Stripe(stripe_config) => Box::new(stripe::StripeProvider::from(stripe_config)),
        PaymentProviderConfig::Dummy => Box::new(dummy::DummyProvider::new()),
    }
}

/// Result type for payment provider operations
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Errors that can occur during payment processing
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment provider API error: {0}")]
    ProviderApi(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid payment data: {0}")]
    InvalidData(String),

    #[error("Webhook signature verification failed: {0}")]
    InvalidSignature(String),

    #[error("Account does not have a payment provider customer ID")]
    NoCustomerId,
}

impl From<PaymentError> for crate::errors::Error {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidData(message) | PaymentError::InvalidSignature(message) => {
                crate::errors::Error::BadRequest { message }
            }
            PaymentError::NoCustomerId => crate::errors::Error::BadRequest {
                message: "No billing profile exists for this account".to_string(),
            },
            PaymentError::ProviderApi(message) => crate::errors::Error::Payment { message },
            PaymentError::Database(e) => crate::errors::Error::Other(e.into()),
        }
    }
}

/// A normalized subscription lifecycle event extracted from a provider webhook.
///
/// Providers deliver events in their own shapes; the webhook handler only deals
/// with this enum. Events arrive with no ordering guarantee, so every variant
/// carries enough state to be applied as a full overwrite.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionEvent {
    /// A subscription was created or changed; carries the complete new state.
    Updated {
        customer_id: String,
        subscription_id: String,
        price_id: Option<String>,
        status: SubscriptionStatus,
        current_period_end: Option<DateTime<Utc>>,
    },
    /// The subscription was deleted at the provider.
    Deleted { customer_id: String },
    /// A recurring payment attempt failed.
    PaymentFailed { customer_id: String },
    /// An event type this service does not react to.
    Ignored { event_type: String },
}

/// Abstract payment provider interface
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a subscription checkout session for the given price.
    ///
    /// Returns a URL that the builder should be redirected to for payment.
    /// Reuses the account's existing customer record when one exists; otherwise
    /// the provider creates one and we persist its id.
    async fn create_checkout_session(
        &self,
        db_pool: &PgPool,
        account: &CurrentAccount,
        price_id: &str,
        cancel_url: &str,
        success_url: &str,
    ) -> Result<String>;

    /// Create a billing portal session for subscription self-service.
    ///
    /// Returns a URL the builder should be redirected to. Fails with
    /// `NoCustomerId` if the account has never gone through checkout.
    async fn create_billing_portal_session(&self, account: &CurrentAccount, return_url: &str) -> Result<String>;

    /// Verify a webhook payload and extract the subscription event it carries.
    ///
    /// Signature verification happens here, before anything touches the
    /// database. Returns None if this provider doesn't deliver webhooks.
    fn parse_webhook(&self, headers: &axum::http::HeaderMap, body: &str) -> Result<Option<SubscriptionEvent>>;
}
