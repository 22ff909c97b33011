//! API request/response models for weekly progress reports.

use crate::api::models::photos::PhotoResponse;
use crate::db::models::reports::ReportDBResponse;
use crate::types::{ProjectId, ReportId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportCreate {
    /// ISO week number, 1-53
    pub week: i32,
    pub year: i32,
    pub summary: Option<String>,
    pub work_completed: Option<String>,
    pub upcoming_work: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportUpdate {
    pub week: Option<i32>,
    pub year: Option<i32>,
    pub summary: Option<String>,
    pub work_completed: Option<String>,
    pub upcoming_work: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ReportId,
    #[schema(value_type = String, format = "uuid")]
    pub project_id: ProjectId,
    pub week: i32,
    pub year: i32,
    pub published: bool,
    pub summary: Option<String>,
    pub work_completed: Option<String>,
    pub upcoming_work: Option<String>,
    /// Photos attached to this report (only included when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<PhotoResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReportDBResponse> for ReportResponse {
    fn from(db: ReportDBResponse) -> Self {
        Self {
            id: db.id,
            project_id: db.project_id,
            week: db.week,
            year: db.year,
            published: db.published,
            summary: db.summary,
            work_completed: db.work_completed,
            upcoming_work: db.upcoming_work,
            photos: None,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
