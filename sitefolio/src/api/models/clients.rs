//! API request/response models for homeowner clients and portal authentication.

use crate::db::models::clients::ClientDBResponse;
use crate::types::{ClientId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a client relates to the project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "client_relationship", rename_all = "UPPERCASE")]
#[serde(rename_all = "snake_case")]
pub enum ClientRelationship {
    Owner,
    Spouse,
    Architect,
    Designer,
    Other,
}

/// The authenticated portal client, loaded by the request extractor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentClient {
    #[schema(value_type = String, format = "uuid")]
    pub id: ClientId,
    #[schema(value_type = String, format = "uuid")]
    pub project_id: ProjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<ClientDBResponse> for CurrentClient {
    fn from(db: ClientDBResponse) -> Self {
        Self {
            id: db.id,
            project_id: db.project_id,
            first_name: db.first_name,
            last_name: db.last_name,
            email: db.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub relationship: ClientRelationship,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<ClientRelationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ClientId,
    #[schema(value_type = String, format = "uuid")]
    pub project_id: ProjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub relationship: ClientRelationship,
    pub invited: bool,
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClientDBResponse> for ClientResponse {
    fn from(db: ClientDBResponse) -> Self {
        Self {
            id: db.id,
            project_id: db.project_id,
            first_name: db.first_name,
            last_name: db.last_name,
            email: db.email,
            phone: db.phone,
            relationship: db.relationship,
            invited: db.invited,
            has_password: db.password_hash.is_some(),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

// Portal authentication bodies.
//
// Responses are deliberately uniform: `{ "success": bool }` or
// `{ "valid": bool }` regardless of whether an email or token exists, so the
// endpoints can't be used to enumerate clients.

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestResetBody {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateTokenBody {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetPasswordBody {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PortalLoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidResponse {
    pub valid: bool,
}

/// Response models that implement IntoResponse for cleaner handler code
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Successful portal login: uniform body plus the session cookie
pub struct PortalLoginResponse {
    pub body: SuccessResponse,
    pub cookie: String,
}

impl IntoResponse for PortalLoginResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::SET_COOKIE, self.cookie.parse().unwrap());
        (StatusCode::OK, headers, Json(self.body)).into_response()
    }
}

/// Portal logout: clears the session cookie
pub struct PortalLogoutResponse {
    pub body: SuccessResponse,
    pub cookie: String,
}

impl IntoResponse for PortalLogoutResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::SET_COOKIE, self.cookie.parse().unwrap());
        (StatusCode::OK, headers, Json(self.body)).into_response()
    }
}
