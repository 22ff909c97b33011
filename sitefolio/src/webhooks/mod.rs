//! Inbound webhook support.
//!
//! The identity provider notifies us of user lifecycle changes over a
//! Standard Webhooks channel; the payments provider delivers subscription
//! events through its own signature scheme (see [`crate::payments`]).
//! HTTP handlers for both live in [`crate::api::handlers::webhooks`].

pub mod events;
pub mod signing;
