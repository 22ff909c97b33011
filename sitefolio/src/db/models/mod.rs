//! Database record models matching table schemas.
//!
//! Each struct here corresponds to a table row and derives `sqlx::FromRow`
//! where it is read back directly. Database models are distinct from API
//! models ([`crate::api::models`]) so storage and API representations can
//! evolve independently; conversions are plain `From` impls.

pub mod accounts;
pub mod client_tokens;
pub mod clients;
pub mod companies;
pub mod documents;
pub mod photos;
pub mod projects;
pub mod reports;
