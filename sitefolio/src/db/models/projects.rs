//! Database models for construction projects.

use crate::types::{AccountId, ProjectId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct ProjectDBResponse {
    pub id: ProjectId,
    pub account_id: AccountId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating a project
#[derive(Debug, Clone)]
pub struct ProjectCreateDBRequest {
    pub account_id: AccountId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// Database request for updating a project
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdateDBRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// Filter for listing projects
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub account_id: Option<AccountId>,
}
