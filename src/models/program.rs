//! Course and program models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::scheduling::QuotaLimits;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub course_name: String,
    pub instructor_id: i64,
}

/// Meeting program offered by a host, either inside a course or global
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramDetails {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: i64,
    pub course_id: Option<i64>,
    pub duration: Option<i32>,
    pub physical_location: Option<String>,
    pub meeting_url: Option<String>,
    pub auto_approve_appointments: bool,
    pub max_daily_meetings: Option<i32>,
    pub max_weekly_meetings: Option<i32>,
    pub max_monthly_meetings: Option<i32>,
    pub is_dropins: bool,
    pub is_range_based: bool,
}

impl ProgramDetails {
    pub fn quota_limits(&self) -> QuotaLimits {
        QuotaLimits {
            daily: self.max_daily_meetings.map(i64::from),
            weekly: self.max_weekly_meetings.map(i64::from),
            monthly: self.max_monthly_meetings.map(i64::from),
        }
    }

    /// Programs without a course are shared across all of the host's courses
    pub fn is_global(&self) -> bool {
        self.course_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub course_name: String,
    pub instructor_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProgramRequest {
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: i64,
    pub course_id: Option<i64>,
    pub duration: Option<i32>,
    pub physical_location: Option<String>,
    pub meeting_url: Option<String>,
    pub auto_approve_appointments: bool,
    pub max_daily_meetings: Option<i32>,
    pub max_weekly_meetings: Option<i32>,
    pub max_monthly_meetings: Option<i32>,
    pub is_dropins: bool,
}
