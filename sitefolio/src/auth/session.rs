//! JWT session token creation and verification.
//!
//! Two independent session audiences exist: builders (claims carry the
//! identity provider's subject, signed with the shared identity secret) and
//! portal clients (claims carry the client row id, signed with our own
//! session secret). A token from one audience never verifies in the other
//! because the secrets differ.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, errors::Error, types::ClientId};

/// Claims for a builder session, as minted by the identity provider's hosted
/// UI (or by tests standing in for it)
#[derive(Debug, Serialize, Deserialize)]
pub struct BuilderSessionClaims {
    /// Identity-provider subject
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Claims for a homeowner portal session
#[derive(Debug, Serialize, Deserialize)]
pub struct ClientSessionClaims {
    pub sub: ClientId,
    pub exp: i64,
    pub iat: i64,
}

impl BuilderSessionClaims {
    pub fn new(external_user_id: &str, email: &str, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.session_expiry;

        Self {
            sub: external_user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

impl ClientSessionClaims {
    pub fn new(client_id: ClientId, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.session_expiry;

        Self {
            sub: client_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Create a JWT for a builder session
pub fn create_builder_session_token(external_user_id: &str, email: &str, config: &Config) -> Result<String, Error> {
    let secret = config.auth.identity.signing_secret.as_ref().ok_or_else(|| Error::Internal {
        operation: "builder sessions: auth.identity.signing_secret is required".to_string(),
    })?;

    let claims = BuilderSessionClaims::new(external_user_id, email, config);
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify and decode a builder session JWT
pub fn verify_builder_session_token(token: &str, config: &Config) -> Result<BuilderSessionClaims, Error> {
    let secret = config.auth.identity.signing_secret.as_ref().ok_or_else(|| Error::Internal {
        operation: "builder sessions: auth.identity.signing_secret is required".to_string(),
    })?;

    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<BuilderSessionClaims>(token, &key, &Validation::default()).map_err(map_jwt_error)?;
    Ok(token_data.claims)
}

/// Create a JWT for a homeowner portal session
pub fn create_client_session_token(client_id: ClientId, config: &Config) -> Result<String, Error> {
    let secret = config.auth.session_secret.as_ref().ok_or_else(|| Error::Internal {
        operation: "client sessions: auth.session_secret is required".to_string(),
    })?;

    let claims = ClientSessionClaims::new(client_id, config);
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify and decode a homeowner portal session JWT
pub fn verify_client_session_token(token: &str, config: &Config) -> Result<ClientSessionClaims, Error> {
    let secret = config.auth.session_secret.as_ref().ok_or_else(|| Error::Internal {
        operation: "client sessions: auth.session_secret is required".to_string(),
    })?;

    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<ClientSessionClaims>(token, &key, &Validation::default()).map_err(map_jwt_error)?;
    Ok(token_data.claims)
}

/// Distinguish client errors (401) from key/configuration errors (500)
fn map_jwt_error(e: jsonwebtoken::errors::Error) -> Error {
    match e.kind() {
        // Client errors - malformed tokens, invalid claims, expired tokens
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::ExpiredSignature
        | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
        | jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAudience
        | jsonwebtoken::errors::ErrorKind::InvalidSubject
        | jsonwebtoken::errors::ErrorKind::ImmatureSignature
        | jsonwebtoken::errors::ErrorKind::Base64(_)
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => Error::Unauthenticated { message: None },

        // Server errors - key issues, internal failures
        jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_)
        | jsonwebtoken::errors::ErrorKind::RsaFailedSigning
        | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName
        | jsonwebtoken::errors::ErrorKind::InvalidKeyFormat
        | jsonwebtoken::errors::ErrorKind::MissingAlgorithm
        | jsonwebtoken::errors::ErrorKind::Json(_)
        | jsonwebtoken::errors::ErrorKind::Utf8(_)
        | jsonwebtoken::errors::ErrorKind::Crypto(_) => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },

        // Catch-all for any future error variants (default to server error for safety)
        _ => Error::Internal {
            operation: format!("JWT verification (unknown error): {e}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.auth.session_secret = Some("test-client-session-secret".to_string());
        config.auth.identity.signing_secret = Some("test-identity-signing-secret".to_string());
        config
    }

    #[test]
    fn test_builder_token_round_trip() {
        let config = create_test_config();

        let token = create_builder_session_token("user_2x9k", "builder@example.com", &config).unwrap();
        let claims = verify_builder_session_token(&token, &config).unwrap();

        assert_eq!(claims.sub, "user_2x9k");
        assert_eq!(claims.email, "builder@example.com");
    }

    #[test]
    fn test_client_token_round_trip() {
        let config = create_test_config();
        let client_id = Uuid::new_v4();

        let token = create_client_session_token(client_id, &config).unwrap();
        let claims = verify_client_session_token(&token, &config).unwrap();

        assert_eq!(claims.sub, client_id);
    }

    #[test]
    fn test_audiences_are_not_interchangeable() {
        let config = create_test_config();

        let builder_token = create_builder_session_token("user_2x9k", "builder@example.com", &config).unwrap();
        let result = verify_client_session_token(&builder_token, &config);
        assert!(matches!(result.unwrap_err(), Error::Unauthenticated { .. }));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = create_test_config();
        let client_id = Uuid::new_v4();

        let token = create_client_session_token(client_id, &config).unwrap();

        let mut other = create_test_config();
        other.auth.session_secret = Some("different-secret".to_string());
        let result = verify_client_session_token(&token, &other);
        assert!(matches!(result.unwrap_err(), Error::Unauthenticated { .. }));
    }

    #[test]
    fn test_verify_expired_token() {
        let config = create_test_config();
        let now = Utc::now();
        let claims = ClientSessionClaims {
            sub: Uuid::new_v4(),
            exp: (now - chrono::Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
        };

        let key = EncodingKey::from_secret(config.auth.session_secret.as_ref().unwrap().as_bytes());
        let token = encode(&Header::default(), &claims, &key).unwrap();

        let result = verify_client_session_token(&token, &config);
        assert!(matches!(result.unwrap_err(), Error::Unauthenticated { .. }));
    }

    #[test]
    fn test_verify_malformed_tokens() {
        let config = create_test_config();

        for token in ["not.a.token", "invalid", "", "too.many.parts.in.this.token"] {
            let result = verify_client_session_token(token, &config);
            assert!(
                matches!(result.unwrap_err(), Error::Unauthenticated { .. }),
                "Expected Unauthenticated error for token: {token}"
            );
        }
    }
}
