//! Subscription billing endpoints.
//!
//! Plan names are validated against the configured plan table before the
//! payment provider is contacted, so a typo'd plan never produces a checkout
//! session.

use axum::{extract::State, Json};

use crate::api::models::accounts::CurrentAccount;
use crate::api::models::billing::{CheckoutRequest, PlanResponse, RedirectResponse};
use crate::errors::{Error, Result};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/billing/plans",
    tag = "billing",
    summary = "List available subscription plans",
    responses(
        (status = 200, description = "Configured plans", body = Vec<PlanResponse>),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_plans(State(state): State<AppState>) -> Json<Vec<PlanResponse>> {
    Json(state.config.billing.plans.iter().map(PlanResponse::from).collect())
}

#[utoipa::path(
    post,
    path = "/billing/checkout",
    tag = "billing",
    summary = "Start a subscription checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout redirect URL", body = RedirectResponse),
        (status = 400, description = "Unknown plan"),
        (status = 401, description = "Not authenticated"),
        (status = 502, description = "Payment provider error"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_checkout(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<RedirectResponse>> {
    // Validate the plan before any provider round-trip
    let plan = state.config.billing.plan_by_name(&body.plan).ok_or_else(|| Error::BadRequest {
        message: format!("Unknown plan: {}", body.plan),
    })?;

    let success_url = format!("{}/app/billing?checkout=success", state.config.base_url);
    let cancel_url = format!("{}/pricing", state.config.base_url);

    let url = state
        .payments
        .create_checkout_session(&state.db, &account, &plan.price_id, &cancel_url, &success_url)
        .await?;

    Ok(Json(RedirectResponse { url }))
}

#[utoipa::path(
    post,
    path = "/billing/portal",
    tag = "billing",
    summary = "Open the payment provider's billing portal",
    responses(
        (status = 200, description = "Billing portal redirect URL", body = RedirectResponse),
        (status = 400, description = "No billing profile exists for this account"),
        (status = 401, description = "Not authenticated"),
        (status = 502, description = "Payment provider error"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_billing_portal(State(state): State<AppState>, account: CurrentAccount) -> Result<Json<RedirectResponse>> {
    let return_url = format!("{}/app/billing", state.config.base_url);
    let url = state.payments.create_billing_portal_session(&account, &return_url).await?;
    Ok(Json(RedirectResponse { url }))
}
