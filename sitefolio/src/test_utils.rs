//! Shared helpers for integration tests.
//!
//! Tests get a fully wired application over a per-test database pool (the
//! sqlx test harness migrates it) with the dummy payment provider, file-based
//! email transport, and fixed signing secrets so tokens and webhook
//! signatures can be minted from test code.

use axum_test::TestServer;
use sqlx::PgPool;

use crate::{
    Application, Config,
    api::models::clients::ClientRelationship,
    auth::session,
    config::{EmailTransportConfig, PaymentProviderConfig},
    db::{
        handlers::{Accounts, ClientTokens, Clients, Projects, Reports, Repository},
        models::{
            accounts::AccountCreateDBRequest,
            clients::ClientCreateDBRequest,
            projects::ProjectCreateDBRequest,
            reports::{ReportCreateDBRequest, ReportUpdateDBRequest},
        },
    },
    types::{AccountId, ClientId, ProjectId},
};

/// Standard Webhooks secret used for the identity webhook in tests
/// (base64 payload of "test-webhook-secret")
pub const TEST_IDENTITY_WEBHOOK_SECRET: &str = "whsec_dGVzdC13ZWJob29rLXNlY3JldA==";

/// Build a config suitable for tests: dummy payments, file email transport,
/// fixed secrets, and cheap password hashing
pub fn create_test_config() -> Config {
    let mut config = Config::default();

    config.auth.session_secret = Some("test-client-session-secret".to_string());
    config.auth.identity.signing_secret = Some("test-identity-signing-secret".to_string());
    config.auth.identity.webhook_secret = Some(TEST_IDENTITY_WEBHOOK_SECRET.to_string());

    // Keep set-password fast in tests
    config.auth.password.argon2_memory_kib = 1024;
    config.auth.password.argon2_iterations = 1;

    config.billing.provider = PaymentProviderConfig::Dummy;

    let email_dir = std::env::temp_dir().join(format!("sitefolio-test-emails-{}", std::process::id()));
    std::fs::create_dir_all(&email_dir).expect("Failed to create test email directory");
    config.email.transport = EmailTransportConfig::File {
        path: email_dir.to_string_lossy().to_string(),
    };

    config
}

/// Build a test server over an existing (migrated) pool
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let app = Application::new_with_pool(create_test_config(), pool)
        .await
        .expect("Failed to create test application");
    app.into_test_server()
}

/// Provision a builder account the way the identity webhook would
pub async fn create_test_account(
    pool: &PgPool,
    external_user_id: &str,
    project_limit: Option<i32>,
) -> crate::db::models::accounts::AccountDBResponse {
    let mut conn = pool.acquire().await.unwrap();
    Accounts::new(&mut conn)
        .upsert_by_external_user_id(&AccountCreateDBRequest {
            external_user_id: external_user_id.to_string(),
            email: format!("{external_user_id}@example.com"),
            name: Some("Test Builder".to_string()),
            project_limit,
        })
        .await
        .unwrap()
}

pub async fn create_test_project(
    pool: &PgPool,
    account_id: AccountId,
    name: &str,
) -> crate::db::models::projects::ProjectDBResponse {
    let mut conn = pool.acquire().await.unwrap();
    Projects::new(&mut conn)
        .create(&ProjectCreateDBRequest {
            account_id,
            name: name.to_string(),
            address: None,
            city: None,
            state: None,
            postal_code: None,
        })
        .await
        .unwrap()
}

pub async fn create_test_client(
    pool: &PgPool,
    project_id: ProjectId,
    email: &str,
) -> crate::db::models::clients::ClientDBResponse {
    let mut conn = pool.acquire().await.unwrap();
    Clients::new(&mut conn)
        .create(&ClientCreateDBRequest {
            project_id,
            first_name: "Jordan".to_string(),
            last_name: "Smith".to_string(),
            email: email.to_string(),
            phone: None,
            relationship: ClientRelationship::Owner,
        })
        .await
        .unwrap()
}

/// Create a report, optionally publishing it
pub async fn create_test_report(
    pool: &PgPool,
    project_id: ProjectId,
    week: i32,
    published: bool,
) -> crate::db::models::reports::ReportDBResponse {
    let mut conn = pool.acquire().await.unwrap();
    let mut reports = Reports::new(&mut conn);
    let report = reports
        .create(&ReportCreateDBRequest {
            project_id,
            week,
            year: 2026,
            summary: Some("Framing complete".to_string()),
            work_completed: None,
            upcoming_work: None,
        })
        .await
        .unwrap();

    if published {
        reports
            .update(
                report.id,
                &ReportUpdateDBRequest {
                    published: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    } else {
        report
    }
}

/// Mint a portal setup token for a client, returning the raw token value
pub async fn issue_client_token(pool: &PgPool, client_id: ClientId) -> String {
    let mut conn = pool.acquire().await.unwrap();
    let (raw_token, _) = ClientTokens::new(&mut conn)
        .create_for_client(client_id, create_test_config().auth.client_token_ttl)
        .await
        .unwrap();
    raw_token
}

/// Build a `Cookie` header value carrying a valid builder session
pub fn builder_session_cookie(account: &crate::db::models::accounts::AccountDBResponse) -> String {
    let config = create_test_config();
    let token = session::create_builder_session_token(&account.external_user_id, &account.email, &config).unwrap();
    format!("{}={token}", config.auth.builder_cookie_name)
}

/// Build a `Cookie` header value carrying a valid portal client session
pub fn client_session_cookie(client_id: ClientId) -> String {
    let config = create_test_config();
    let token = session::create_client_session_token(client_id, &config).unwrap();
    format!("{}={token}", config.auth.client_cookie_name)
}
