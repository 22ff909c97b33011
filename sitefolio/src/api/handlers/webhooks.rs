//! Inbound webhook receivers.
//!
//! Both receivers verify the request signature before touching the database.
//! An invalid signature is rejected outright; a valid but unrecognized event
//! is logged and acknowledged so the sender does not retry it forever.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, info, warn};

use crate::api::models::accounts::SubscriptionStatus;
use crate::db::handlers::Accounts;
use crate::db::models::accounts::{AccountCreateDBRequest, SubscriptionStateDBRequest};
use crate::errors::{Error, Result};
use crate::payments::SubscriptionEvent;
use crate::webhooks::{
    events::{IdentityEvent, IdentityEventType},
    signing,
};
use crate::AppState;

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[utoipa::path(
    post,
    path = "/webhooks/identity",
    tag = "webhooks",
    summary = "Identity provider webhook receiver",
    description = "Receives Standard Webhooks signed user lifecycle events and provisions builder accounts.",
    responses(
        (status = 204, description = "Event processed"),
        (status = 400, description = "Malformed payload or headers"),
        (status = 401, description = "Missing or invalid signature"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn identity_webhook(State(state): State<AppState>, headers: HeaderMap, body: String) -> Result<StatusCode> {
    let secret = state
        .config
        .auth
        .identity
        .webhook_secret
        .as_deref()
        .ok_or_else(|| Error::Internal {
            operation: "verify identity webhook: no webhook secret configured".to_string(),
        })?;

    // Signature check comes first; nothing below runs for a forged request
    let msg_id = header_str(&headers, "webhook-id").ok_or_else(|| Error::Unauthenticated {
        message: Some("Missing webhook-id header".to_string()),
    })?;
    let timestamp: i64 = header_str(&headers, "webhook-timestamp")
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::Unauthenticated {
            message: Some("Missing or invalid webhook-timestamp header".to_string()),
        })?;
    let signature = header_str(&headers, "webhook-signature").ok_or_else(|| Error::Unauthenticated {
        message: Some("Missing webhook-signature header".to_string()),
    })?;

    if !signing::verify_signature(msg_id, timestamp, &body, signature, secret) {
        warn!(msg_id, "Rejected identity webhook with invalid signature");
        return Err(Error::Unauthenticated {
            message: Some("Invalid webhook signature".to_string()),
        });
    }

    let event: IdentityEvent = serde_json::from_str(&body).map_err(|e| Error::BadRequest {
        message: format!("Invalid identity event payload: {e}"),
    })?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut accounts = Accounts::new(&mut conn);

    match event.event_type {
        IdentityEventType::UserCreated | IdentityEventType::UserUpdated => {
            let email = event.data.email.ok_or_else(|| Error::BadRequest {
                message: "Identity event missing email".to_string(),
            })?;
            let account = accounts
                .upsert_by_external_user_id(&AccountCreateDBRequest {
                    external_user_id: event.data.id,
                    email,
                    name: event.data.name,
                    project_limit: Some(state.config.billing.free_tier_project_limit),
                })
                .await?;
            info!(account_id = %account.id, "Provisioned builder account from identity event");
        }
        IdentityEventType::UserDeleted => {
            let deleted = accounts.delete_by_external_user_id(&event.data.id).await?;
            if deleted {
                info!("Deleted builder account from identity event");
            } else {
                debug!("Identity deletion event for unknown user, ignoring");
            }
        }
        IdentityEventType::Unknown(ref other) => {
            debug!(event_type = %other, "Ignoring unrecognized identity event");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/webhooks/payments",
    tag = "webhooks",
    summary = "Payment provider webhook receiver",
    description = "Receives signed subscription lifecycle events and reconciles account subscription state.",
    responses(
        (status = 200, description = "Event acknowledged"),
        (status = 400, description = "Missing or invalid signature"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn payments_webhook(State(state): State<AppState>, headers: HeaderMap, body: String) -> Result<StatusCode> {
    // parse_webhook verifies the provider signature; an Err here means the
    // request never reaches the database
    let Some(event) = state.payments.parse_webhook(&headers, &body)? else {
        debug!("Payment provider has no webhook support, acknowledging");
        return Ok(StatusCode::OK);
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut accounts = Accounts::new(&mut conn);

    // Every branch overwrites the full subscription state keyed by the
    // provider customer id, so redelivered events settle on the same row
    // values instead of compounding
    match event {
        SubscriptionEvent::Updated {
            customer_id,
            subscription_id,
            price_id,
            status,
            current_period_end,
        } => {
            let project_limit = price_id
                .as_deref()
                .and_then(|p| state.config.billing.plan_by_price_id(p))
                .map(|plan| plan.project_limit)
                .unwrap_or(Some(state.config.billing.free_tier_project_limit));

            let updated = accounts
                .apply_subscription_state(
                    &customer_id,
                    &SubscriptionStateDBRequest {
                        stripe_subscription_id: Some(subscription_id),
                        stripe_price_id: price_id,
                        subscription_status: status,
                        current_period_end,
                        project_limit,
                    },
                )
                .await?;
            match updated {
                Some(account) => info!(account_id = %account.id, status = ?status, "Reconciled subscription state"),
                None => warn!("Subscription event for unknown customer, ignoring"),
            }
        }
        SubscriptionEvent::Deleted { customer_id } => {
            let updated = accounts
                .apply_subscription_state(
                    &customer_id,
                    &SubscriptionStateDBRequest {
                        stripe_subscription_id: None,
                        stripe_price_id: None,
                        subscription_status: SubscriptionStatus::Canceled,
                        current_period_end: None,
                        project_limit: Some(state.config.billing.free_tier_project_limit),
                    },
                )
                .await?;
            match updated {
                Some(account) => info!(account_id = %account.id, "Subscription canceled, reverted to free tier limit"),
                None => warn!("Subscription deletion for unknown customer, ignoring"),
            }
        }
        SubscriptionEvent::PaymentFailed { customer_id } => {
            // Preserve the stored plan fields; only the status flips
            match accounts.get_by_stripe_customer_id(&customer_id).await? {
                Some(account) => {
                    accounts
                        .apply_subscription_state(
                            &customer_id,
                            &SubscriptionStateDBRequest {
                                stripe_subscription_id: account.stripe_subscription_id,
                                stripe_price_id: account.stripe_price_id,
                                subscription_status: SubscriptionStatus::PastDue,
                                current_period_end: account.current_period_end,
                                project_limit: account.project_limit,
                            },
                        )
                        .await?;
                    info!(account_id = %account.id, "Marked subscription past due after failed payment");
                }
                None => warn!("Payment failure for unknown customer, ignoring"),
            }
        }
        SubscriptionEvent::Ignored { event_type } => {
            debug!(event_type = %event_type, "Ignoring unhandled payment event");
        }
    }

    // Acknowledge every verified event so the provider stops retrying
    Ok(StatusCode::OK)
}
