//! Database models for homeowner clients.

use crate::api::models::clients::ClientRelationship;
use crate::types::{ClientId, ProjectId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct ClientDBResponse {
    pub id: ClientId,
    pub project_id: ProjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub relationship: ClientRelationship,
    pub invited: bool,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating a client
#[derive(Debug, Clone)]
pub struct ClientCreateDBRequest {
    pub project_id: ProjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub relationship: ClientRelationship,
}

/// Database request for updating a client
#[derive(Debug, Clone, Default)]
pub struct ClientUpdateDBRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<ClientRelationship>,
    pub invited: Option<bool>,
    pub password_hash: Option<String>,
}

/// Filter for listing clients
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub project_id: Option<ProjectId>,
    pub email: Option<String>,
}
