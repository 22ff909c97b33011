//! API request/response models for project and report photos.

use crate::db::models::photos::PhotoDBResponse;
use crate::types::{PhotoId, ProjectId, ReportId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Attach an already-uploaded photo URL to a project or report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoCreate {
    pub url: String,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub report_id: Option<ReportId>,
    pub caption: Option<String>,
}

/// Query parameters for listing photos
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListPhotosQuery {
    /// Only photos attached to this report
    #[param(value_type = Option<String>, format = "uuid")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub report_id: Option<ReportId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PhotoId,
    #[schema(value_type = String, format = "uuid")]
    pub project_id: ProjectId,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub report_id: Option<ReportId>,
    pub url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PhotoDBResponse> for PhotoResponse {
    fn from(db: PhotoDBResponse) -> Self {
        Self {
            id: db.id,
            project_id: db.project_id,
            report_id: db.report_id,
            url: db.url,
            caption: db.caption,
            created_at: db.created_at,
        }
    }
}
