//! API request/response models.
//!
//! These types define the JSON surface of the service; conversions from the
//! corresponding `db::models` types live alongside them.

pub mod accounts;
pub mod billing;
pub mod clients;
pub mod companies;
pub mod documents;
pub mod photos;
pub mod portal;
pub mod projects;
pub mod reports;
