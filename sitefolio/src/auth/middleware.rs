//! Route classification and login redirects.
//!
//! Every request path is partitioned into one of three categories by plain
//! string-prefix matching, before the router matches anything:
//!
//! - **Builder** (`/app/...`): requires the builder session cookie
//! - **ClientPortal** (`/portal/...`): requires the client session cookie,
//!   except the login/setup pages and the portal auth endpoints, which must
//!   be reachable while logged out
//! - **Public**: everything else (marketing pages, webhooks, health, docs)
//!
//! The gatekeeper only checks cookie *presence* and redirects to the matching
//! login page when it is absent. It performs no cryptographic verification;
//! that happens in the extractors ([`crate::auth::current_user`]) when a
//! handler actually needs the session.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::trace;

use crate::{AppState, auth::current_user::extract_cookie};

/// Which side of the app a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Builder,
    ClientPortal,
}

/// Portal paths that must work without a session: the login and setup pages
/// plus the JSON auth endpoints they call.
const PORTAL_PUBLIC_PREFIXES: &[&str] = &["/portal/login", "/portal/setup", "/portal/api/v1/auth"];

/// Classify a request path by string-prefix matching
pub fn classify_route(path: &str) -> RouteClass {
    if path == "/app" || path.starts_with("/app/") {
        return RouteClass::Builder;
    }

    if path == "/portal" || path.starts_with("/portal/") {
        if PORTAL_PUBLIC_PREFIXES.iter().any(|p| path == *p || path.starts_with(&format!("{p}/"))) {
            return RouteClass::Public;
        }
        return RouteClass::ClientPortal;
    }

    RouteClass::Public
}

/// Redirect requests without the relevant session cookie to the login page
/// for their side of the app.
pub async fn gatekeeper_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (cookie_name, login_path) = match classify_route(request.uri().path()) {
        RouteClass::Public => return next.run(request).await,
        RouteClass::Builder => (&state.config.auth.builder_cookie_name, "/sign-in"),
        RouteClass::ClientPortal => (&state.config.auth.client_cookie_name, "/portal/login"),
    };

    let (parts, body) = request.into_parts();
    if extract_cookie(&parts, cookie_name).is_none() {
        trace!("Unauthenticated request to {}, redirecting to {}", parts.uri.path(), login_path);
        return Redirect::to(login_path).into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_paths() {
        assert_eq!(classify_route("/app"), RouteClass::Builder);
        assert_eq!(classify_route("/app/api/v1/projects"), RouteClass::Builder);
        assert_eq!(classify_route("/app/billing"), RouteClass::Builder);
        // Prefix matching must not swallow similarly named public paths
        assert_eq!(classify_route("/apple"), RouteClass::Public);
    }

    #[test]
    fn test_client_portal_paths() {
        assert_eq!(classify_route("/portal"), RouteClass::ClientPortal);
        assert_eq!(classify_route("/portal/api/v1/project"), RouteClass::ClientPortal);
        assert_eq!(classify_route("/portfolio"), RouteClass::Public);
    }

    #[test]
    fn test_portal_auth_endpoints_are_public() {
        assert_eq!(classify_route("/portal/login"), RouteClass::Public);
        assert_eq!(classify_route("/portal/setup"), RouteClass::Public);
        assert_eq!(classify_route("/portal/api/v1/auth/password-resets"), RouteClass::Public);
        assert_eq!(classify_route("/portal/api/v1/auth/login"), RouteClass::Public);
    }

    #[test]
    fn test_public_paths() {
        assert_eq!(classify_route("/"), RouteClass::Public);
        assert_eq!(classify_route("/pricing"), RouteClass::Public);
        assert_eq!(classify_route("/healthz"), RouteClass::Public);
        assert_eq!(classify_route("/webhooks/payments"), RouteClass::Public);
        assert_eq!(classify_route("/webhooks/identity"), RouteClass::Public);
    }
}
