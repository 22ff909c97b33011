//! Company branding endpoints.
//!
//! Each builder account owns at most one company. Creating a company links it
//! to the account in the same transaction, so a crash can never leave an
//! orphaned company behind.

use axum::{extract::State, http::StatusCode, Json};
use sqlx::Acquire;

use crate::api::models::accounts::CurrentAccount;
use crate::api::models::companies::{CompanyCreate, CompanyResponse, CompanyUpdate};
use crate::db::handlers::{Accounts, Companies, Repository};
use crate::db::models::accounts::AccountUpdateDBRequest;
use crate::db::models::companies::{CompanyCreateDBRequest, CompanyUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/company",
    tag = "company",
    summary = "Create the account's company",
    request_body = CompanyCreate,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 400, description = "Account already has a company"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_company(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(body): Json<CompanyCreate>,
) -> Result<(StatusCode, Json<CompanyResponse>)> {
    if account.company_id.is_some() {
        return Err(Error::BadRequest {
            message: "Account already has a company".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let company;
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        company = Companies::new(conn)
            .create(&CompanyCreateDBRequest {
                name: body.name,
                logo_url: body.logo_url,
                primary_color: body.primary_color,
                secondary_color: body.secondary_color,
                accent_color: body.accent_color,
            })
            .await?;
    }
    {
        let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;
        Accounts::new(conn)
            .update(
                account.id,
                &AccountUpdateDBRequest {
                    company_id: Some(company.id),
                    ..Default::default()
                },
            )
            .await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CompanyResponse::from(company))))
}

#[utoipa::path(
    get,
    path = "/company",
    tag = "company",
    summary = "Get the account's company",
    responses(
        (status = 200, description = "Company branding", body = CompanyResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No company configured yet"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_company(State(state): State<AppState>, account: CurrentAccount) -> Result<Json<CompanyResponse>> {
    let company_id = account.company_id.ok_or_else(|| Error::NotFound {
        resource: "Company".to_string(),
        id: account.id.to_string(),
    })?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let company = Companies::new(&mut conn)
        .get_by_id(company_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Company".to_string(),
            id: company_id.to_string(),
        })?;
    Ok(Json(CompanyResponse::from(company)))
}

#[utoipa::path(
    patch,
    path = "/company",
    tag = "company",
    summary = "Update the account's company branding",
    request_body = CompanyUpdate,
    responses(
        (status = 200, description = "Updated company", body = CompanyResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No company configured yet"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_company(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(body): Json<CompanyUpdate>,
) -> Result<Json<CompanyResponse>> {
    let company_id = account.company_id.ok_or_else(|| Error::NotFound {
        resource: "Company".to_string(),
        id: account.id.to_string(),
    })?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let updated = Companies::new(&mut conn)
        .update(
            company_id,
            &CompanyUpdateDBRequest {
                name: body.name,
                logo_url: body.logo_url,
                primary_color: body.primary_color,
                secondary_color: body.secondary_color,
                accent_color: body.accent_color,
            },
        )
        .await?;
    Ok(Json(CompanyResponse::from(updated)))
}
