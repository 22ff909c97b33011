//! Composite response for the client portal project view.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::companies::CompanyResponse;
use crate::api::models::documents::DocumentResponse;
use crate::api::models::projects::ProjectResponse;
use crate::api::models::reports::ReportResponse;

/// Everything a portal client sees about their project in one payload:
/// address, builder branding, published reports (with photos), and shared
/// documents. Unpublished reports are never included.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PortalProjectResponse {
    pub project: ProjectResponse,
    /// Builder branding, when the builder has configured a company
    pub company: Option<CompanyResponse>,
    pub reports: Vec<ReportResponse>,
    pub documents: Vec<DocumentResponse>,
}
