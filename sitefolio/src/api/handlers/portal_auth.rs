//! Client portal authentication endpoints.
//!
//! These endpoints are reachable without a session and are hardened against
//! account enumeration: every response body is a uniform `{ "success": bool }`
//! or `{ "valid": bool }` whether or not the email or token exists, and login
//! failures are indistinguishable between unknown email, unset password, and
//! wrong password.

use axum::{extract::State, Json};
use tracing::{debug, warn};

use crate::api::models::clients::{
    PortalLoginBody, PortalLoginResponse, PortalLogoutResponse, RequestResetBody, SetPasswordBody, SuccessResponse, ValidResponse,
    ValidateTokenBody,
};
use crate::auth::{
    password::{self, Argon2Params},
    session,
};
use crate::db::handlers::{ClientTokens, Clients, Repository};
use crate::db::models::clients::ClientUpdateDBRequest;
use crate::errors::{Error, Result};
use crate::AppState;

fn argon2_params(state: &AppState) -> Argon2Params {
    let p = &state.config.auth.password;
    Argon2Params {
        memory_kib: p.argon2_memory_kib,
        iterations: p.argon2_iterations,
        parallelism: p.argon2_parallelism,
    }
}

#[utoipa::path(
    post,
    path = "/auth/request-reset",
    tag = "portal-auth",
    summary = "Request a password reset email",
    request_body = RequestResetBody,
    responses(
        (status = 200, description = "Always succeeds, whether or not the email is known", body = SuccessResponse),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn request_reset(State(state): State<AppState>, Json(body): Json<RequestResetBody>) -> Result<Json<SuccessResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    if let Some(client) = Clients::new(&mut conn).get_by_email(&body.email).await? {
        let (raw_token, _token) = ClientTokens::new(&mut conn)
            .create_for_client(client.id, state.config.auth.client_token_ttl)
            .await?;

        // A failed send is logged but not surfaced: the response must not
        // reveal whether the email matched a client
        if let Err(e) = state
            .email
            .send_password_reset_email(&client.email, Some(&client.first_name), &raw_token)
            .await
        {
            warn!("Failed to send password reset email: {e}");
        }
    } else {
        debug!("Password reset requested for unknown email");
    }

    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    post,
    path = "/auth/validate-token",
    tag = "portal-auth",
    summary = "Check whether a setup token is still valid",
    request_body = ValidateTokenBody,
    responses(
        (status = 200, description = "Token validity, without consuming it", body = ValidResponse),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn validate_token(State(state): State<AppState>, Json(body): Json<ValidateTokenBody>) -> Result<Json<ValidResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let valid = ClientTokens::new(&mut conn).validate(&body.token).await?;
    Ok(Json(ValidResponse { valid }))
}

#[utoipa::path(
    post,
    path = "/auth/set-password",
    tag = "portal-auth",
    summary = "Set a password using a one-time setup token",
    request_body = SetPasswordBody,
    responses(
        (status = 200, description = "Whether the token was accepted", body = SuccessResponse),
        (status = 400, description = "Password does not meet length requirements"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn set_password(State(state): State<AppState>, Json(body): Json<SetPasswordBody>) -> Result<Json<SuccessResponse>> {
    let rules = &state.config.auth.password;
    if body.password.len() < rules.min_length || body.password.len() > rules.max_length {
        return Err(Error::BadRequest {
            message: format!(
                "Password must be between {} and {} characters",
                rules.min_length, rules.max_length
            ),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    // Consuming deletes every row carrying this token value, so it can never
    // authenticate twice
    let Some(client_id) = ClientTokens::new(&mut conn).consume(&body.token).await? else {
        debug!("Setup token rejected: unknown, expired, or already consumed");
        return Ok(Json(SuccessResponse { success: false }));
    };

    // Hash on a blocking thread to avoid stalling the async runtime
    let params = argon2_params(&state);
    let raw_password = body.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&raw_password, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    Clients::new(&mut conn)
        .update(
            client_id,
            &ClientUpdateDBRequest {
                password_hash: Some(password_hash),
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "portal-auth",
    summary = "Log in to the client portal",
    request_body = PortalLoginBody,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = SuccessResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(body): Json<PortalLoginBody>) -> Result<PortalLoginResponse> {
    // One uniform failure for unknown email, unset password, and bad password
    let invalid = || Error::Unauthenticated {
        message: Some("Invalid email or password".to_string()),
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let client = Clients::new(&mut conn).get_by_email(&body.email).await?.ok_or_else(invalid)?;
    let password_hash = client.password_hash.as_deref().ok_or_else(invalid)?;

    if !password::verify_string(&body.password, password_hash)? {
        return Err(invalid());
    }

    let token = session::create_client_session_token(client.id, &state.config)?;
    let cookie = create_client_session_cookie(&token, &state.config);

    Ok(PortalLoginResponse {
        body: SuccessResponse { success: true },
        cookie,
    })
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "portal-auth",
    summary = "Log out of the client portal",
    responses(
        (status = 200, description = "Session cookie cleared", body = SuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> PortalLogoutResponse {
    // Expired cookie clears the session
    let cookie = format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0",
        state.config.auth.client_cookie_name
    );

    PortalLogoutResponse {
        body: SuccessResponse { success: true },
        cookie,
    }
}

/// Helper function to create a client session cookie
fn create_client_session_cookie(token: &str, config: &crate::config::Config) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age={}",
        config.auth.client_cookie_name,
        token,
        config.auth.session_expiry.as_secs()
    )
}
