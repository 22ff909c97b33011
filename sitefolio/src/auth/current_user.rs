//! Extractors for the authenticated builder or portal client.
//!
//! Route-classification middleware only checks cookie *presence*; these
//! extractors do the real work of verifying the session JWT and loading the
//! corresponding database row. Handlers name the extractor they need, so a
//! client session can never reach a builder handler and vice versa.

use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::PgPool;
use tracing::{debug, instrument, trace};

use crate::{
    AppState,
    api::models::{accounts::CurrentAccount, clients::CurrentClient},
    auth::session,
    db::{
        errors::DbError,
        handlers::{Accounts, Clients, Repository},
    },
    errors::{Error, Result},
};

/// Pull a named cookie out of the request headers
pub(crate) fn extract_cookie(parts: &Parts, cookie_name: &str) -> Option<String> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=')
            && name == cookie_name
        {
            return Some(value.to_string());
        }
    }
    None
}

/// Extract a builder session from the session cookie, if present and valid.
/// Returns:
/// - None: No session cookie present
/// - Some(Ok(claims)): Valid JWT found and verified
/// - Some(Err(error)): Cookie present but the token failed verification
#[instrument(skip(parts, config))]
fn try_builder_session(parts: &Parts, config: &crate::config::Config) -> Option<Result<session::BuilderSessionClaims>> {
    let token = extract_cookie(parts, &config.auth.builder_cookie_name)?;
    Some(session::verify_builder_session_token(&token, config))
}

#[instrument(skip(parts, config))]
fn try_client_session(parts: &Parts, config: &crate::config::Config) -> Option<Result<session::ClientSessionClaims>> {
    let token = extract_cookie(parts, &config.auth.client_cookie_name)?;
    Some(session::verify_client_session_token(&token, config))
}

/// Load the account row behind a verified builder session
async fn load_account(db: &PgPool, external_user_id: &str) -> Result<Option<CurrentAccount>> {
    let mut conn = db.acquire().await.map_err(DbError::from)?;
    let account = Accounts::new(&mut conn).get_by_external_user_id(external_user_id).await?;
    Ok(account.map(CurrentAccount::from))
}

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match try_builder_session(parts, &state.config) {
            Some(Ok(claims)) => match load_account(&state.db, &claims.sub).await? {
                Some(account) => {
                    debug!("Authenticated builder account: {}", account.id);
                    Ok(account)
                }
                // Session is valid but the identity webhook has not provisioned
                // the account yet (or it was deleted)
                None => Err(Error::Unauthenticated {
                    message: Some("Account not found".to_string()),
                }),
            },
            Some(Err(e)) => {
                trace!("Builder session verification failed: {:?}", e);
                Err(Error::Unauthenticated { message: None })
            }
            None => {
                trace!("No builder session cookie present");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}

impl FromRequestParts<AppState> for CurrentClient {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match try_client_session(parts, &state.config) {
            Some(Ok(claims)) => {
                let mut conn = state.db.acquire().await.map_err(DbError::from)?;
                match Clients::new(&mut conn).get_by_id(claims.sub).await? {
                    Some(client) => {
                        debug!("Authenticated portal client: {}", client.id);
                        Ok(CurrentClient::from(client))
                    }
                    None => Err(Error::Unauthenticated { message: None }),
                }
            }
            Some(Err(e)) => {
                trace!("Client session verification failed: {:?}", e);
                Err(Error::Unauthenticated { message: None })
            }
            None => {
                trace!("No client session cookie present");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_with_cookie(cookie: &str) -> Parts {
        let request = axum::http::Request::builder()
            .uri("http://localhost/test")
            .header(axum::http::header::COOKIE, cookie)
            .body(())
            .unwrap();
        let (parts, _body) = request.into_parts();
        parts
    }

    #[test]
    fn test_extract_cookie_finds_named_cookie() {
        let parts = parts_with_cookie("other=1; portal_session=abc123; trailing=x");
        assert_eq!(extract_cookie(&parts, "portal_session").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_extract_cookie_missing() {
        let parts = parts_with_cookie("other=1");
        assert_eq!(extract_cookie(&parts, "portal_session"), None);
    }

    #[test]
    fn test_extract_cookie_no_header() {
        let request = axum::http::Request::builder().uri("http://localhost/test").body(()).unwrap();
        let (parts, _body) = request.into_parts();
        assert_eq!(extract_cookie(&parts, "portal_session"), None);
    }
}
