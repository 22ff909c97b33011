//! Common type definitions shared across the crate.
//!
//! All entity IDs are UUIDs wrapped in type aliases for better type safety:
//!
//! - [`AccountId`]: Builder account identifier
//! - [`CompanyId`]: Branding company identifier
//! - [`ProjectId`]: Construction project identifier
//! - [`ClientId`]: Homeowner/stakeholder identifier
//! - [`ClientTokenId`]: Single-use portal token identifier
//! - [`ReportId`]: Progress report identifier
//! - [`PhotoId`]: Photo identifier
//! - [`DocumentId`]: Project document identifier

use uuid::Uuid;

pub type AccountId = Uuid;
pub type CompanyId = Uuid;
pub type ProjectId = Uuid;
pub type ClientId = Uuid;
pub type ClientTokenId = Uuid;
pub type ReportId = Uuid;
pub type PhotoId = Uuid;
pub type DocumentId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }
}
