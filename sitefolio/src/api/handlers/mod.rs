//! HTTP request handlers for all API endpoints.
//!
//! This module contains Axum route handlers organized by resource type.
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Authentication and authorization checks
//! - Business logic execution via database repositories
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`accounts`]: Builder account profile retrieval and updates
//! - [`billing`]: Plan listing, subscription checkout, and billing portal
//! - [`clients`]: Project client CRUD and portal invitations
//! - [`companies`]: Company branding creation and updates
//! - [`documents`]: Link-type document CRUD
//! - [`pages`]: Public pages (pricing, sign-in/sign-up redirects)
//! - [`photos`]: Photo attachment, listing, and deletion
//! - [`portal`]: Read-only project view for authenticated clients
//! - [`portal_auth`]: Client portal login, token validation, and password setup
//! - [`projects`]: Project CRUD with plan-limit enforcement
//! - [`reports`]: Weekly progress report CRUD and publishing
//! - [`uploads`]: Multipart file uploads forwarded to object storage
//! - [`webhooks`]: Identity provider and payment provider webhook receivers
//!
//! # Authentication
//!
//! Builder handlers extract [`crate::api::models::accounts::CurrentAccount`];
//! portal handlers extract [`crate::api::models::clients::CurrentClient`].
//! Webhook receivers authenticate via request signatures instead.

pub mod accounts;
pub mod billing;
pub mod clients;
pub mod companies;
pub mod documents;
pub mod pages;
pub mod photos;
pub mod portal;
pub mod portal_auth;
pub mod projects;
pub mod reports;
pub mod uploads;
pub mod webhooks;
