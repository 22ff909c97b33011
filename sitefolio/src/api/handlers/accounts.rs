//! Builder account profile endpoints.

use axum::{extract::State, Json};

use crate::api::models::accounts::{AccountResponse, AccountUpdate, CurrentAccount};
use crate::db::handlers::{Accounts, Repository};
use crate::db::models::accounts::AccountUpdateDBRequest;
use crate::errors::{Error, Result};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/account",
    tag = "account",
    summary = "Get the current builder account",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_account(State(state): State<AppState>, account: CurrentAccount) -> Result<Json<AccountResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let db_account = Accounts::new(&mut conn)
        .get_by_id(account.id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Account".to_string(),
            id: account.id.to_string(),
        })?;
    Ok(Json(AccountResponse::from(db_account)))
}

#[utoipa::path(
    patch,
    path = "/account",
    tag = "account",
    summary = "Update the current builder account",
    request_body = AccountUpdate,
    responses(
        (status = 200, description = "Updated account", body = AccountResponse),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_account(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(body): Json<AccountUpdate>,
) -> Result<Json<AccountResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let update = AccountUpdateDBRequest {
        name: body.name,
        ..Default::default()
    };
    let updated = Accounts::new(&mut conn).update(account.id, &update).await?;
    Ok(Json(AccountResponse::from(updated)))
}
