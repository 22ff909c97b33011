//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction, provides
//! strongly-typed CRUD operations, and returns records from
//! [`crate::db::models`]. Repositories created from a transaction share its
//! ACID guarantees.
//!
//! # Available Repositories
//!
//! - [`Accounts`]: Builder accounts and subscription state
//! - [`Companies`]: Branding profiles
//! - [`Projects`]: Construction projects (with plan-limit counting)
//! - [`Clients`]: Homeowner portal members
//! - [`ClientTokens`]: Single-use portal token lifecycle
//! - [`Reports`]: Weekly progress reports
//! - [`Photos`]: Project and report photos
//! - [`Documents`]: Project documents and links
//!
//! # Common Pattern
//!
//! ```ignore
//! use sitefolio::db::handlers::{Projects, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Projects::new(&mut tx);
//!     let projects = repo.list(&Default::default()).await?;
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod accounts;
pub mod client_tokens;
pub mod clients;
pub mod companies;
pub mod documents;
pub mod photos;
pub mod projects;
pub mod reports;
pub mod repository;

pub use accounts::Accounts;
pub use client_tokens::ClientTokens;
pub use clients::Clients;
pub use companies::Companies;
pub use documents::Documents;
pub use photos::Photos;
pub use projects::Projects;
pub use reports::Reports;
pub use repository::Repository;
