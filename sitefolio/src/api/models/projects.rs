//! API request/response models for construction projects.

use crate::db::models::projects::ProjectDBResponse;
use crate::types::{AccountId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectCreate {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ProjectId,
    #[schema(value_type = String, format = "uuid")]
    pub account_id: AccountId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectDBResponse> for ProjectResponse {
    fn from(db: ProjectDBResponse) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            name: db.name,
            address: db.address,
            city: db.city,
            state: db.state,
            postal_code: db.postal_code,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
