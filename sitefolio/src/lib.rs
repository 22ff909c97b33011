//! # sitefolio: Branded Progress-Report Portals for Builders
//!
//! `sitefolio` is a multi-tenant service for construction builders who want to
//! give homeowners a branded window into their project. Builders manage
//! projects, weekly progress reports, photos, and documents through the app
//! API; each homeowner gets a read-only portal scoped to exactly one project,
//! styled with the builder's company branding.
//!
//! ## Overview
//!
//! The service exposes three surfaces on one Axum router:
//!
//! - **Builder app** (`/app/api/v1/*`): account, company branding, project
//!   CRUD (gated by the subscription plan's project limit), clients, reports
//!   with publish/unpublish, photos, documents, multipart uploads, and
//!   billing.
//! - **Client portal** (`/portal/api/v1/*`): enumeration-resistant auth
//!   endpoints (one-time setup tokens, password login) and a single composite
//!   project view that only ever contains published reports.
//! - **Webhooks** (`/webhooks/*`): a Standard Webhooks receiver that
//!   provisions builder accounts from the identity provider, and a payment
//!   provider receiver that reconciles subscription state. Both verify
//!   signatures before touching the database.
//!
//! ### Request Flow
//!
//! Every request first passes through the gatekeeper middleware
//! ([`auth::middleware`]), which classifies the path and redirects requests
//! without the relevant session cookie to the login page for their side of
//! the app. Cookie *verification* happens later, in the extractors
//! ([`api::models::accounts::CurrentAccount`] and
//! [`api::models::clients::CurrentClient`]), so the middleware stays cheap
//! and the handlers stay precise about which session kind they accept.
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) contains the route handlers and the JSON
//! request/response models. The **database layer** ([`db`]) uses the
//! repository pattern over compile-time-checked sqlx queries. The **payments
//! layer** ([`payments`]) abstracts the subscription provider behind a trait
//! with Stripe and dummy implementations. Outbound email ([`email`]) and
//! object storage ([`media`]) round out the service dependencies, all carried
//! in [`AppState`].

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod errors;
pub mod media;
mod openapi;
pub mod payments;
pub mod telemetry;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router, ServiceExt,
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::middleware::gatekeeper_middleware;
use crate::email::EmailService;
use crate::media::MediaStore;
use crate::openapi::ApiDoc;
use crate::payments::PaymentProvider;

/// Shared application state passed to all route handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .email(email)
///     .payments(payments)
///     .media(media)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub email: Arc<EmailService>,
    pub payments: Arc<dyn PaymentProvider>,
    pub media: Arc<MediaStore>,
}

/// Get the sitefolio database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to the database and run migrations
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;
    migrator().run(&pool).await?;
    Ok(pool)
}

/// Create CORS layer allowing the configured frontend origin
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = config.base_url.trim_end_matches('/').parse::<HeaderValue>()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .expose_headers(vec![axum::http::header::LOCATION]))
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - Builder app API under `/app/api/v1`
/// - Client portal API under `/portal/api/v1`
/// - Webhook receivers under `/webhooks`
/// - Public pages (`/pricing`, `/sign-in`, `/sign-up`) and `/healthz`
/// - API docs served by Scalar at `/docs`
/// - CORS and tracing middleware
///
/// The gatekeeper middleware is NOT applied here: it must run before path
/// matching, so [`Application::serve`] layers it over the finished router.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    // Allow some slack over the upload cap for multipart framing; the upload
    // handlers enforce the exact per-file limit
    let upload_body_limit = state.config.media.max_upload_bytes + 64 * 1024;

    // Builder app API
    let app_routes = Router::new()
        .route("/account", get(api::handlers::accounts::get_account))
        .route("/account", patch(api::handlers::accounts::update_account))
        // Company branding
        .route("/company", post(api::handlers::companies::create_company))
        .route("/company", get(api::handlers::companies::get_company))
        .route("/company", patch(api::handlers::companies::update_company))
        // Projects
        .route("/projects", get(api::handlers::projects::list_projects))
        .route("/projects", post(api::handlers::projects::create_project))
        .route("/projects/{project_id}", get(api::handlers::projects::get_project))
        .route("/projects/{project_id}", patch(api::handlers::projects::update_project))
        .route("/projects/{project_id}", delete(api::handlers::projects::delete_project))
        // Clients as project sub-resources
        .route("/projects/{project_id}/clients", get(api::handlers::clients::list_clients))
        .route("/projects/{project_id}/clients", post(api::handlers::clients::create_client))
        .route(
            "/projects/{project_id}/clients/{client_id}",
            patch(api::handlers::clients::update_client),
        )
        .route(
            "/projects/{project_id}/clients/{client_id}",
            delete(api::handlers::clients::delete_client),
        )
        .route(
            "/projects/{project_id}/clients/{client_id}/invite",
            post(api::handlers::clients::invite_client),
        )
        // Reports
        .route("/projects/{project_id}/reports", get(api::handlers::reports::list_reports))
        .route("/projects/{project_id}/reports", post(api::handlers::reports::create_report))
        .route(
            "/projects/{project_id}/reports/{report_id}",
            get(api::handlers::reports::get_report),
        )
        .route(
            "/projects/{project_id}/reports/{report_id}",
            patch(api::handlers::reports::update_report),
        )
        .route(
            "/projects/{project_id}/reports/{report_id}",
            delete(api::handlers::reports::delete_report),
        )
        .route(
            "/projects/{project_id}/reports/{report_id}/publish",
            post(api::handlers::reports::publish_report),
        )
        .route(
            "/projects/{project_id}/reports/{report_id}/unpublish",
            post(api::handlers::reports::unpublish_report),
        )
        // Photos
        .route("/projects/{project_id}/photos", get(api::handlers::photos::list_photos))
        .route("/projects/{project_id}/photos", post(api::handlers::photos::create_photo))
        .route(
            "/projects/{project_id}/photos/{photo_id}",
            delete(api::handlers::photos::delete_photo),
        )
        .route(
            "/projects/{project_id}/photos/upload",
            post(api::handlers::uploads::upload_photo).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        // Documents
        .route("/projects/{project_id}/documents", get(api::handlers::documents::list_documents))
        .route("/projects/{project_id}/documents", post(api::handlers::documents::create_document))
        .route(
            "/projects/{project_id}/documents/{document_id}",
            get(api::handlers::documents::get_document),
        )
        .route(
            "/projects/{project_id}/documents/{document_id}",
            delete(api::handlers::documents::delete_document),
        )
        .route(
            "/projects/{project_id}/documents/upload",
            post(api::handlers::uploads::upload_document).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        // Billing
        .route("/billing/plans", get(api::handlers::billing::list_plans))
        .route("/billing/checkout", post(api::handlers::billing::create_checkout))
        .route("/billing/portal", post(api::handlers::billing::create_billing_portal))
        .with_state(state.clone());

    // Client portal API (auth endpoints are public, project view needs a session)
    let portal_routes = Router::new()
        .route("/auth/request-reset", post(api::handlers::portal_auth::request_reset))
        .route("/auth/validate-token", post(api::handlers::portal_auth::validate_token))
        .route("/auth/set-password", post(api::handlers::portal_auth::set_password))
        .route("/auth/login", post(api::handlers::portal_auth::login))
        .route("/auth/logout", post(api::handlers::portal_auth::logout))
        .route("/project", get(api::handlers::portal::get_project))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        // Webhook receivers (external services, signature-authenticated)
        .route("/webhooks/identity", post(api::handlers::webhooks::identity_webhook))
        .route("/webhooks/payments", post(api::handlers::webhooks::payments_webhook))
        // Public pages
        .route("/pricing", get(api::handlers::pages::pricing))
        .route("/sign-in", get(api::handlers::pages::sign_in))
        .route("/sign-up", get(api::handlers::pages::sign_up))
        .with_state(state.clone())
        .nest("/app/api/v1", app_routes)
        .nest("/portal/api/v1", portal_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, and constructs the email, media, and payment services
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts
///    handling requests
/// 3. **Shutdown**: when the shutdown signal resolves, in-flight requests
///    drain and database connections close
pub struct Application {
    router: Router,
    app_state: AppState,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = setup_database(&config).await?;
        Self::from_pool(config, pool).await
    }

    /// Create an application on an existing pool (used by tests, where the
    /// pool comes pre-migrated from the test harness)
    pub async fn new_with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        Self::from_pool(config, pool).await
    }

    async fn from_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        tracing::debug!("Starting sitefolio with configuration: {:#?}", config);

        let email = Arc::new(EmailService::new(&config)?);
        let media = Arc::new(MediaStore::new(&config.media).await);
        let payments: Arc<dyn PaymentProvider> = Arc::from(payments::create_provider(config.billing.provider.clone()));

        let app_state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .email(email)
            .payments(payments)
            .media(media)
            .build();

        let router = build_router(&app_state)?;

        Ok(Self {
            router,
            app_state,
            config,
            pool,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        // Apply the gatekeeper before path matching, as serve() does
        let middleware = from_fn_with_state(self.app_state, gatekeeper_middleware);
        let service = middleware.layer(self.router).into_make_service();
        axum_test::TestServer::new(service).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "sitefolio listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Apply the gatekeeper before path matching so it sees every request,
        // including ones that would otherwise 404
        let middleware = from_fn_with_state(self.app_state, gatekeeper_middleware);
        let service = middleware.layer(self.router);

        axum::serve(listener, service.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        api::models::accounts::SubscriptionStatus,
        db::{
            handlers::{Accounts, ClientTokens, Projects},
            models::accounts::SubscriptionStateDBRequest,
        },
        test_utils::*,
        webhooks::signing,
    };
    use sqlx::PgPool;

    /// Routes without the relevant session cookie bounce to the login page
    /// for their side of the app.
    #[sqlx::test]
    #[test_log::test]
    async fn test_unauthenticated_requests_redirect_to_login(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/app/api/v1/projects").await;
        assert_eq!(response.status_code().as_u16(), 303);
        assert_eq!(response.header("location"), "/sign-in");

        let response = server.get("/portal/api/v1/project").await;
        assert_eq!(response.status_code().as_u16(), 303);
        assert_eq!(response.header("location"), "/portal/login");

        // Public paths pass through untouched
        let response = server.get("/healthz").await;
        assert_eq!(response.status_code().as_u16(), 200);

        // Portal auth endpoints are public by design
        let response = server
            .post("/portal/api/v1/auth/validate-token")
            .json(&serde_json::json!({"token": "whatever"}))
            .await;
        assert_eq!(response.status_code().as_u16(), 200);
        assert_eq!(response.json::<serde_json::Value>()["valid"], false);
    }

    /// A setup token validates any number of times without being consumed,
    /// then dies the moment it is used to set a password.
    #[sqlx::test]
    #[test_log::test]
    async fn test_setup_token_is_single_use(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let account = create_test_account(&pool, "builder-1", Some(5)).await;
        let project = create_test_project(&pool, account.id, "12 Oak Street").await;
        let client = create_test_client(&pool, project.id, "homeowner@example.com").await;

        let raw_token = issue_client_token(&pool, client.id).await;

        // Non-consuming validation, twice
        for _ in 0..2 {
            let response = server
                .post("/portal/api/v1/auth/validate-token")
                .json(&serde_json::json!({"token": raw_token}))
                .await;
            assert_eq!(response.json::<serde_json::Value>()["valid"], true);
        }

        // Consume it by setting a password
        let response = server
            .post("/portal/api/v1/auth/set-password")
            .json(&serde_json::json!({"token": raw_token, "password": "correct-horse-battery"}))
            .await;
        assert_eq!(response.status_code().as_u16(), 200);
        assert_eq!(response.json::<serde_json::Value>()["success"], true);

        // Dead on both endpoints afterwards
        let response = server
            .post("/portal/api/v1/auth/validate-token")
            .json(&serde_json::json!({"token": raw_token}))
            .await;
        assert_eq!(response.json::<serde_json::Value>()["valid"], false);

        let response = server
            .post("/portal/api/v1/auth/set-password")
            .json(&serde_json::json!({"token": raw_token, "password": "another-password-attempt"}))
            .await;
        assert_eq!(response.json::<serde_json::Value>()["success"], false);
    }

    /// An expired token is deleted on sight and never validates again.
    #[sqlx::test]
    #[test_log::test]
    async fn test_expired_token_rejected(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let account = create_test_account(&pool, "builder-2", Some(5)).await;
        let project = create_test_project(&pool, account.id, "7 Birch Lane").await;
        let client = create_test_client(&pool, project.id, "owner@example.com").await;

        let raw_token = issue_client_token(&pool, client.id).await;

        // Backdate the expiry
        sqlx::query!(
            "UPDATE client_tokens SET expires_at = NOW() - INTERVAL '1 hour' WHERE client_id = $1",
            client.id
        )
        .execute(&pool)
        .await
        .unwrap();

        let response = server
            .post("/portal/api/v1/auth/validate-token")
            .json(&serde_json::json!({"token": raw_token}))
            .await;
        assert_eq!(response.json::<serde_json::Value>()["valid"], false);

        // The expired row was deleted, not just rejected
        let mut conn = pool.acquire().await.unwrap();
        let consumed = ClientTokens::new(&mut conn).consume(&raw_token).await.unwrap();
        assert!(consumed.is_none());
    }

    /// Portal login failures are indistinguishable between unknown email,
    /// unset password, and wrong password.
    #[sqlx::test]
    #[test_log::test]
    async fn test_portal_login_failures_are_uniform(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let account = create_test_account(&pool, "builder-3", Some(5)).await;
        let project = create_test_project(&pool, account.id, "3 Cedar Court").await;
        // Client exists but has never set a password
        create_test_client(&pool, project.id, "no-password@example.com").await;

        let unknown = server
            .post("/portal/api/v1/auth/login")
            .json(&serde_json::json!({"email": "nobody@example.com", "password": "x"}))
            .await;
        let no_password = server
            .post("/portal/api/v1/auth/login")
            .json(&serde_json::json!({"email": "no-password@example.com", "password": "x"}))
            .await;

        assert_eq!(unknown.status_code().as_u16(), 401);
        assert_eq!(no_password.status_code().as_u16(), 401);
        assert_eq!(unknown.json::<serde_json::Value>(), no_password.json::<serde_json::Value>());
    }

    /// A plan name not in the configured table is rejected before the payment
    /// provider is contacted.
    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_plan_rejected_before_provider(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        let account = create_test_account(&pool, "builder-4", Some(5)).await;
        let cookie = builder_session_cookie(&account);

        let response = server
            .post("/app/api/v1/billing/checkout")
            .add_header("cookie", &cookie)
            .json(&serde_json::json!({"plan": "platinum-deluxe"}))
            .await;
        assert_eq!(response.status_code().as_u16(), 400);

        // Known plan goes through (dummy provider echoes the success URL)
        let response = server
            .post("/app/api/v1/billing/checkout")
            .add_header("cookie", &cookie)
            .json(&serde_json::json!({"plan": "starter"}))
            .await;
        assert_eq!(response.status_code().as_u16(), 200);
        let url = response.json::<serde_json::Value>()["url"].as_str().unwrap().to_string();
        assert!(url.contains("/app/billing"));
    }

    /// Project creation is refused at the numeric plan limit and never
    /// refused for a NULL (unlimited) limit.
    #[sqlx::test]
    #[test_log::test]
    async fn test_project_limit_enforced(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let limited = create_test_account(&pool, "builder-limited", Some(1)).await;
        let cookie = builder_session_cookie(&limited);

        let response = server
            .post("/app/api/v1/projects")
            .add_header("cookie", &cookie)
            .json(&serde_json::json!({"name": "First build"}))
            .await;
        assert_eq!(response.status_code().as_u16(), 201);

        let response = server
            .post("/app/api/v1/projects")
            .add_header("cookie", &cookie)
            .json(&serde_json::json!({"name": "Second build"}))
            .await;
        assert_eq!(response.status_code().as_u16(), 403);

        let unlimited = create_test_account(&pool, "builder-unlimited", None).await;
        let cookie = builder_session_cookie(&unlimited);
        for i in 0..5 {
            let response = server
                .post("/app/api/v1/projects")
                .add_header("cookie", &cookie)
                .json(&serde_json::json!({"name": format!("Build {i}")}))
                .await;
            assert_eq!(response.status_code().as_u16(), 201);
        }
    }

    /// The identity webhook rejects bad signatures before any database write
    /// and provisions accounts idempotently on valid ones.
    #[sqlx::test]
    #[test_log::test]
    async fn test_identity_webhook_verifies_before_provisioning(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let payload = serde_json::json!({
            "type": "user.created",
            "data": {"id": "idp_user_42", "email": "new-builder@example.com", "name": "Pat"}
        })
        .to_string();

        // Forged signature: rejected, nothing written
        let response = server
            .post("/webhooks/identity")
            .add_header("webhook-id", "msg_1")
            .add_header("webhook-timestamp", "1700000000")
            .add_header("webhook-signature", "v1,Zm9yZ2VkLXNpZ25hdHVyZQ==")
            .text(payload.clone())
            .await;
        assert_eq!(response.status_code().as_u16(), 401);

        let mut conn = pool.acquire().await.unwrap();
        let account = Accounts::new(&mut conn).get_by_external_user_id("idp_user_42").await.unwrap();
        assert!(account.is_none());

        // Valid signature: provisioned with the free-tier limit
        let signature = signing::sign_payload("msg_1", 1700000000, &payload, TEST_IDENTITY_WEBHOOK_SECRET).unwrap();
        let response = server
            .post("/webhooks/identity")
            .add_header("webhook-id", "msg_1")
            .add_header("webhook-timestamp", "1700000000")
            .add_header("webhook-signature", &signature)
            .text(payload.clone())
            .await;
        assert_eq!(response.status_code().as_u16(), 204);

        let account = Accounts::new(&mut conn)
            .get_by_external_user_id("idp_user_42")
            .await
            .unwrap()
            .expect("account should be provisioned");
        assert_eq!(account.email, "new-builder@example.com");
        assert_eq!(account.project_limit, Some(1));

        // Redelivery upserts rather than duplicating
        let response = server
            .post("/webhooks/identity")
            .add_header("webhook-id", "msg_1")
            .add_header("webhook-timestamp", "1700000000")
            .add_header("webhook-signature", &signature)
            .text(payload)
            .await;
        assert_eq!(response.status_code().as_u16(), 204);

        let count = sqlx::query_scalar!("SELECT COUNT(*) FROM accounts WHERE external_user_id = 'idp_user_42'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, Some(1));
    }

    /// Subscription state application is a full overwrite keyed by customer
    /// id, so redelivering the same event is a no-op.
    #[sqlx::test]
    #[test_log::test]
    async fn test_subscription_state_is_idempotent(pool: PgPool) {
        let account = create_test_account(&pool, "builder-sub", Some(1)).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut accounts = Accounts::new(&mut conn);
        accounts.set_stripe_customer_id(account.id, "cus_123").await.unwrap();

        let request = SubscriptionStateDBRequest {
            stripe_subscription_id: Some("sub_123".to_string()),
            stripe_price_id: Some("price_pro".to_string()),
            subscription_status: SubscriptionStatus::Active,
            current_period_end: Some(chrono::Utc::now() + chrono::Duration::days(30)),
            project_limit: Some(10),
        };

        let first = accounts.apply_subscription_state("cus_123", &request).await.unwrap().unwrap();
        let second = accounts.apply_subscription_state("cus_123", &request).await.unwrap().unwrap();

        assert_eq!(first.stripe_subscription_id, second.stripe_subscription_id);
        assert_eq!(first.subscription_status, second.subscription_status);
        assert_eq!(second.project_limit, Some(10));

        // Unknown customer: no row touched, no error
        let missing = accounts.apply_subscription_state("cus_unknown", &request).await.unwrap();
        assert!(missing.is_none());
    }

    /// A payment failure flips the stored status to past-due, and the value
    /// round-trips through the database enum.
    #[sqlx::test]
    #[test_log::test]
    async fn test_payment_failure_marks_account_past_due(pool: PgPool) {
        let account = create_test_account(&pool, "builder-pastdue", Some(3)).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut accounts = Accounts::new(&mut conn);
        accounts.set_stripe_customer_id(account.id, "cus_late").await.unwrap();

        let request = SubscriptionStateDBRequest {
            stripe_subscription_id: Some("sub_late".to_string()),
            stripe_price_id: Some("price_pro".to_string()),
            subscription_status: SubscriptionStatus::PastDue,
            current_period_end: None,
            project_limit: Some(10),
        };
        let updated = accounts.apply_subscription_state("cus_late", &request).await.unwrap().unwrap();
        assert_eq!(updated.subscription_status, SubscriptionStatus::PastDue);

        // Read the row back rather than trusting the RETURNING value
        let reread = accounts.get_by_stripe_customer_id("cus_late").await.unwrap().unwrap();
        assert_eq!(reread.subscription_status, SubscriptionStatus::PastDue);
    }

    /// The portal project view only ever contains published reports.
    #[sqlx::test]
    #[test_log::test]
    async fn test_portal_only_sees_published_reports(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let account = create_test_account(&pool, "builder-5", Some(5)).await;
        let project = create_test_project(&pool, account.id, "9 Elm Drive").await;
        let client = create_test_client(&pool, project.id, "viewer@example.com").await;

        create_test_report(&pool, project.id, 10, true).await;
        create_test_report(&pool, project.id, 11, false).await;

        let cookie = client_session_cookie(client.id);
        let response = server.get("/portal/api/v1/project").add_header("cookie", &cookie).await;
        assert_eq!(response.status_code().as_u16(), 200);

        let body = response.json::<serde_json::Value>();
        let reports = body["reports"].as_array().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0]["week"], 10);
        assert_eq!(reports[0]["published"], true);
    }

    /// Project access is tenant-scoped: another builder's project reads as
    /// not found, never as forbidden.
    #[sqlx::test]
    #[test_log::test]
    async fn test_projects_are_tenant_scoped(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let owner = create_test_account(&pool, "builder-owner", Some(5)).await;
        let other = create_test_account(&pool, "builder-other", Some(5)).await;
        let project = create_test_project(&pool, owner.id, "1 Maple Way").await;

        let response = server
            .get(&format!("/app/api/v1/projects/{}", project.id))
            .add_header("cookie", &builder_session_cookie(&other))
            .await;
        assert_eq!(response.status_code().as_u16(), 404);

        let response = server
            .get(&format!("/app/api/v1/projects/{}", project.id))
            .add_header("cookie", &builder_session_cookie(&owner))
            .await;
        assert_eq!(response.status_code().as_u16(), 200);

        let mut conn = pool.acquire().await.unwrap();
        let count = Projects::new(&mut conn).count_for_account(owner.id).await.unwrap();
        assert_eq!(count, 1);
    }
}
