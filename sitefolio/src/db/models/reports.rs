//! Database models for weekly progress reports.

use crate::types::{ProjectId, ReportId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct ReportDBResponse {
    pub id: ReportId,
    pub project_id: ProjectId,
    pub week: i32,
    pub year: i32,
    pub published: bool,
    pub summary: Option<String>,
    pub work_completed: Option<String>,
    pub upcoming_work: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating a report
#[derive(Debug, Clone)]
pub struct ReportCreateDBRequest {
    pub project_id: ProjectId,
    pub week: i32,
    pub year: i32,
    pub summary: Option<String>,
    pub work_completed: Option<String>,
    pub upcoming_work: Option<String>,
}

/// Database request for updating a report
#[derive(Debug, Clone, Default)]
pub struct ReportUpdateDBRequest {
    pub week: Option<i32>,
    pub year: Option<i32>,
    pub published: Option<bool>,
    pub summary: Option<String>,
    pub work_completed: Option<String>,
    pub upcoming_work: Option<String>,
}

/// Filter for listing reports
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub project_id: Option<ProjectId>,
    /// When set, only reports with a matching publish flag are returned.
    /// The client portal always queries with `Some(true)`.
    pub published: Option<bool>,
}
