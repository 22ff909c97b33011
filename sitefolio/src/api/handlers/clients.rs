//! Project client endpoints.
//!
//! Clients are the homeowners and stakeholders who receive portal access to a
//! single project. The invite endpoint issues a one-time setup token and emails
//! a setup link; the client never gets a builder session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgConnection;

use crate::api::handlers::projects::load_owned_project;
use crate::api::models::accounts::CurrentAccount;
use crate::api::models::clients::{ClientCreate, ClientResponse, ClientUpdate};
use crate::db::handlers::{ClientTokens, Clients, Companies, Repository};
use crate::db::models::clients::{ClientCreateDBRequest, ClientDBResponse, ClientFilter, ClientUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::{ClientId, ProjectId};
use crate::AppState;

/// Load a client and verify it belongs to the given project.
async fn load_project_client(conn: &mut PgConnection, project_id: ProjectId, client_id: ClientId) -> Result<ClientDBResponse> {
    let client = Clients::new(conn).get_by_id(client_id).await?;
    match client {
        Some(c) if c.project_id == project_id => Ok(c),
        _ => Err(Error::NotFound {
            resource: "Client".to_string(),
            id: client_id.to_string(),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/projects/{project_id}/clients",
    tag = "clients",
    summary = "List clients on a project",
    params(("project_id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "List of clients", body = Vec<ClientResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_clients(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<ClientResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let clients = Clients::new(&mut conn)
        .list(&ClientFilter {
            project_id: Some(project_id),
            ..Default::default()
        })
        .await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/projects/{project_id}/clients",
    tag = "clients",
    summary = "Add a client to a project",
    params(("project_id" = String, Path, description = "Project ID")),
    request_body = ClientCreate,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Client email already on the project"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_client(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<ClientCreate>,
) -> Result<(StatusCode, Json<ClientResponse>)> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;

    let client = Clients::new(&mut conn)
        .create(&ClientCreateDBRequest {
            project_id,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            phone: body.phone,
            relationship: body.relationship,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

#[utoipa::path(
    patch,
    path = "/projects/{project_id}/clients/{client_id}",
    tag = "clients",
    summary = "Update a client",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("client_id" = String, Path, description = "Client ID")
    ),
    request_body = ClientUpdate,
    responses(
        (status = 200, description = "Updated client", body = ClientResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or client not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_client(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, client_id)): Path<(ProjectId, ClientId)>,
    Json(body): Json<ClientUpdate>,
) -> Result<Json<ClientResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;
    load_project_client(&mut conn, project_id, client_id).await?;

    let updated = Clients::new(&mut conn)
        .update(
            client_id,
            &ClientUpdateDBRequest {
                first_name: body.first_name,
                last_name: body.last_name,
                phone: body.phone,
                relationship: body.relationship,
                ..Default::default()
            },
        )
        .await?;
    Ok(Json(ClientResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/projects/{project_id}/clients/{client_id}",
    tag = "clients",
    summary = "Remove a client from a project",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("client_id" = String, Path, description = "Client ID")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or client not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_client(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, client_id)): Path<(ProjectId, ClientId)>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;
    load_project_client(&mut conn, project_id, client_id).await?;
    Clients::new(&mut conn).delete(client_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/projects/{project_id}/clients/{client_id}/invite",
    tag = "clients",
    summary = "Invite a client to the portal",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("client_id" = String, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Invitation sent", body = ClientResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Project or client not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn invite_client(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path((project_id, client_id)): Path<(ProjectId, ClientId)>,
) -> Result<Json<ClientResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_owned_project(&mut conn, &account, project_id).await?;
    let client = load_project_client(&mut conn, project_id, client_id).await?;

    // The invite email is branded with the builder's company name when one is
    // configured
    let company_name = match account.company_id {
        Some(company_id) => Companies::new(&mut conn)
            .get_by_id(company_id)
            .await?
            .map(|c| c.name)
            .unwrap_or_else(|| "Your builder".to_string()),
        None => "Your builder".to_string(),
    };

    // Issuing a new token invalidates any previous one for this client
    let (raw_token, _token) = ClientTokens::new(&mut conn)
        .create_for_client(client_id, state.config.auth.client_token_ttl)
        .await?;

    let updated = Clients::new(&mut conn)
        .update(
            client_id,
            &ClientUpdateDBRequest {
                invited: Some(true),
                ..Default::default()
            },
        )
        .await?;

    state
        .email
        .send_portal_invite_email(&client.email, Some(&client.first_name), &company_name, &raw_token)
        .await?;

    Ok(Json(ClientResponse::from(updated)))
}
