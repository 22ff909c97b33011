//! API request/response models for branding companies.

use crate::db::models::companies::CompanyDBResponse;
use crate::types::CompanyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyCreate {
    pub name: String,
    pub logo_url: Option<String>,
    /// Hex color like "#1f2937"; server defaults apply when omitted
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CompanyId,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CompanyDBResponse> for CompanyResponse {
    fn from(db: CompanyDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            logo_url: db.logo_url,
            primary_color: db.primary_color,
            secondary_color: db.secondary_color,
            accent_color: db.accent_color,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
