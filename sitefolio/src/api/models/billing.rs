//! API request/response models for subscription billing.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::PlanConfig;

/// A subscription plan as advertised on the pricing page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlanResponse {
    pub name: String,
    /// None means unlimited projects
    pub project_limit: Option<i32>,
}

impl From<&PlanConfig> for PlanResponse {
    fn from(plan: &PlanConfig) -> Self {
        Self {
            name: plan.name.clone(),
            project_limit: plan.project_limit,
        }
    }
}

/// Request to start a subscription checkout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Plan name from the plan table (e.g., "pro")
    pub plan: String,
}

/// Redirect target returned by checkout and billing portal endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RedirectResponse {
    pub url: String,
}
