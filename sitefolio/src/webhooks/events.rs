//! Identity provider webhook event types.
//!
//! The identity provider delivers user lifecycle notifications as JSON payloads
//! with a dotted `type` discriminator. Unknown event types are deserialized
//! into [`IdentityEventType::Unknown`] so the handler can acknowledge them
//! without failing the delivery.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity webhook event types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum IdentityEventType {
    /// A new user signed up through the hosted UI
    #[serde(rename = "user.created")]
    UserCreated,
    /// Profile fields changed at the provider
    #[serde(rename = "user.updated")]
    UserUpdated,
    /// The user deleted their identity
    #[serde(rename = "user.deleted")]
    UserDeleted,
    /// Any event type this service does not handle
    #[serde(untagged)]
    Unknown(String),
}

impl std::fmt::Display for IdentityEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserCreated => write!(f, "user.created"),
            Self::UserUpdated => write!(f, "user.updated"),
            Self::UserDeleted => write!(f, "user.deleted"),
            Self::Unknown(other) => write!(f, "{other}"),
        }
    }
}

/// User data included in identity webhook payloads.
///
/// Deletion events carry only the `id`; email and name are absent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdentityUserData {
    /// The provider's stable identifier for the user
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Complete identity webhook event payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdentityEvent {
    /// Event type (e.g., "user.created")
    #[serde(rename = "type")]
    pub event_type: IdentityEventType,
    /// Event-specific data
    pub data: IdentityUserData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_event_deserializes() {
        let json = r#"{"type":"user.created","data":{"id":"user_abc","email":"b@example.com","name":"B"}}"#;
        let event: IdentityEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.event_type, IdentityEventType::UserCreated);
        assert_eq!(event.data.id, "user_abc");
        assert_eq!(event.data.email.as_deref(), Some("b@example.com"));
    }

    #[test]
    fn test_unknown_event_type_preserved() {
        let json = r#"{"type":"session.revoked","data":{"id":"user_abc"}}"#;
        let event: IdentityEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.event_type, IdentityEventType::Unknown("session.revoked".to_string()));
        assert!(event.data.email.is_none());
    }

    #[test]
    fn test_deletion_event_without_profile_fields() {
        let json = r#"{"type":"user.deleted","data":{"id":"user_abc"}}"#;
        let event: IdentityEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.event_type, IdentityEventType::UserDeleted);
        assert!(event.data.email.is_none());
        assert!(event.data.name.is_none());
    }
}
