//! Database layer for data persistence and access.
//!
//! Implements the data access layer using SQLx with PostgreSQL, following the
//! Repository pattern: API handlers talk to repositories ([`handlers`]), which
//! run compile-checked queries and return record structs ([`models`]).
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types

pub mod errors;
pub mod handlers;
pub mod models;
