//! Database models for branding companies.

use crate::types::CompanyId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct CompanyDBResponse {
    pub id: CompanyId,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating a company
#[derive(Debug, Clone)]
pub struct CompanyCreateDBRequest {
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
}

/// Database request for updating a company
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdateDBRequest {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
}

/// Filter for listing companies (no filters currently needed)
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {}
