//! Authentication for builders and portal clients.
//!
//! Two session audiences share this module:
//!
//! - **Builders** authenticate through the identity provider's hosted UI; the
//!   resulting session JWT (signed with the shared identity secret) is carried
//!   in a cookie and mapped to an account row by its subject claim.
//! - **Clients** (homeowners) authenticate with a password set up via a
//!   single-use emailed token; their session JWT is signed with our own
//!   session secret.
//!
//! # Modules
//!
//! - [`current_user`]: Extractors resolving sessions to database rows
//! - [`middleware`]: Route classification and login-page redirects
//! - [`password`]: Argon2 hashing and opaque token generation
//! - [`session`]: JWT creation and verification for both audiences

pub mod current_user;
pub mod middleware;
pub mod password;
pub mod session;
