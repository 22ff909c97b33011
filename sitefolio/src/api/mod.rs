//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! The API is divided into several functional areas:
//!
//! - **Builder app** (`/app/api/v1/*`): Account, company, projects, clients,
//!   reports, photos, documents, uploads, and billing for authenticated
//!   builders
//! - **Client portal** (`/portal/api/v1/*`): Uniform-response auth endpoints
//!   and the read-only project view for homeowners
//! - **Webhooks** (`/webhooks/*`): Signed receivers for the identity provider
//!   and the payment provider
//! - **Public pages** (`/pricing`, `/sign-in`, `/sign-up`): Pricing table and
//!   hosted-auth redirects

pub mod handlers;
pub mod models;
