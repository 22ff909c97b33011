//! Database models for project and report photos.

use crate::types::{PhotoId, ProjectId, ReportId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct PhotoDBResponse {
    pub id: PhotoId,
    pub project_id: ProjectId,
    pub report_id: Option<ReportId>,
    pub url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database request for attaching a photo
#[derive(Debug, Clone)]
pub struct PhotoCreateDBRequest {
    pub project_id: ProjectId,
    pub report_id: Option<ReportId>,
    pub url: String,
    pub caption: Option<String>,
}

/// Filter for listing photos
#[derive(Debug, Clone, Default)]
pub struct PhotoFilter {
    pub project_id: Option<ProjectId>,
    pub report_id: Option<ReportId>,
}
