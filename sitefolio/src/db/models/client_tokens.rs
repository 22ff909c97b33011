//! Database models for single-use client portal tokens.

use crate::types::{ClientId, ClientTokenId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database entity model.
///
/// The opaque token value is stored verbatim because the portal contract is
/// find-by-token: validation and consumption both look the row up by value.
#[derive(Debug, Clone, FromRow)]
pub struct ClientToken {
    pub id: ClientTokenId,
    pub client_id: ClientId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
}

/// Request for creating a client token
#[derive(Debug, Clone)]
pub struct ClientTokenCreateRequest {
    pub client_id: ClientId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
