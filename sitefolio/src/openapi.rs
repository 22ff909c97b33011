//! OpenAPI documentation configuration.
//!
//! One document covers both API surfaces (builder app and client portal) plus
//! the webhook receivers; it is served by Scalar at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::api::{handlers, models};

/// Registers the session-cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "CookieAuth".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("sitefolio_session"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sitefolio API",
        description = "Branded construction progress-report portals for builders and their homeowners.",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        handlers::accounts::get_account,
        handlers::accounts::update_account,
        handlers::companies::create_company,
        handlers::companies::get_company,
        handlers::companies::update_company,
        handlers::projects::list_projects,
        handlers::projects::create_project,
        handlers::projects::get_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::clients::list_clients,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::clients::invite_client,
        handlers::reports::list_reports,
        handlers::reports::create_report,
        handlers::reports::get_report,
        handlers::reports::update_report,
        handlers::reports::delete_report,
        handlers::reports::publish_report,
        handlers::reports::unpublish_report,
        handlers::photos::list_photos,
        handlers::photos::create_photo,
        handlers::photos::delete_photo,
        handlers::documents::list_documents,
        handlers::documents::create_document,
        handlers::documents::get_document,
        handlers::documents::delete_document,
        handlers::uploads::upload_photo,
        handlers::uploads::upload_document,
        handlers::billing::list_plans,
        handlers::billing::create_checkout,
        handlers::billing::create_billing_portal,
        handlers::portal_auth::request_reset,
        handlers::portal_auth::validate_token,
        handlers::portal_auth::set_password,
        handlers::portal_auth::login,
        handlers::portal_auth::logout,
        handlers::portal::get_project,
        handlers::webhooks::identity_webhook,
        handlers::webhooks::payments_webhook,
    ),
    components(schemas(
        models::accounts::AccountResponse,
        models::accounts::AccountUpdate,
        models::accounts::SubscriptionStatus,
        models::billing::CheckoutRequest,
        models::billing::PlanResponse,
        models::billing::RedirectResponse,
        models::clients::ClientCreate,
        models::clients::ClientRelationship,
        models::clients::ClientResponse,
        models::clients::ClientUpdate,
        models::clients::PortalLoginBody,
        models::clients::RequestResetBody,
        models::clients::SetPasswordBody,
        models::clients::SuccessResponse,
        models::clients::ValidResponse,
        models::clients::ValidateTokenBody,
        models::companies::CompanyCreate,
        models::companies::CompanyResponse,
        models::companies::CompanyUpdate,
        models::documents::DocumentKind,
        models::documents::DocumentLinkCreate,
        models::documents::DocumentResponse,
        models::photos::PhotoCreate,
        models::photos::PhotoResponse,
        models::portal::PortalProjectResponse,
        models::projects::ProjectCreate,
        models::projects::ProjectResponse,
        models::projects::ProjectUpdate,
        models::reports::ReportCreate,
        models::reports::ReportResponse,
        models::reports::ReportUpdate,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "account", description = "Builder account profile"),
        (name = "company", description = "Company branding"),
        (name = "projects", description = "Construction projects"),
        (name = "clients", description = "Project clients and portal invitations"),
        (name = "reports", description = "Weekly progress reports"),
        (name = "photos", description = "Project and report photos"),
        (name = "documents", description = "Project documents"),
        (name = "billing", description = "Subscription plans and checkout"),
        (name = "portal-auth", description = "Client portal authentication"),
        (name = "portal", description = "Client portal project view"),
        (name = "webhooks", description = "Inbound webhook receivers"),
    )
)]
pub struct ApiDoc;
