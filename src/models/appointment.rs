//! Appointment model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Posted,
    Pending,
    Reserved,
    Inactive,
    Canceled,
    Completed,
    Missed,
    Rejected,
}

impl AppointmentStatus {
    /// Statuses that count against a host's meeting quota
    pub const HELD: [AppointmentStatus; 2] = [AppointmentStatus::Reserved, AppointmentStatus::Pending];

    pub fn is_held(&self) -> bool {
        Self::HELD.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Posted => "posted",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Reserved => "reserved",
            AppointmentStatus::Inactive => "inactive",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Missed => "missed",
            AppointmentStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub instructor_id: i64,
    pub attendee_id: Option<i64>,
    pub availability_id: i64,
    pub course_id: Option<i64>,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub physical_location: Option<String>,
    pub meeting_url: Option<String>,
}

impl Appointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.appointment_date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.appointment_date.and_time(self.end_time)
    }

    pub fn has_started(&self, now: NaiveDateTime) -> bool {
        self.starts_at() <= now
    }
}

/// Slot row to insert for a freshly created availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub instructor_id: i64,
    pub availability_id: i64,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub physical_location: Option<String>,
    pub meeting_url: Option<String>,
}

/// Which appointments a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingFilter {
    #[default]
    All,
    Upcoming,
    Past,
    Pending,
}

impl std::str::FromStr for MeetingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "" => Ok(MeetingFilter::All),
            "upcoming" => Ok(MeetingFilter::Upcoming),
            "past" => Ok(MeetingFilter::Past),
            "pending" => Ok(MeetingFilter::Pending),
            other => Err(format!("unknown meeting filter: {}", other)),
        }
    }
}

/// Appointment joined with program, course and the other party, for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppointmentListing {
    pub appointment_id: i64,
    pub program_id: i64,
    pub name: String,
    pub course_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub physical_location: Option<String>,
    pub meeting_url: Option<String>,
    pub counterpart_name: Option<String>,
    pub counterpart_title: Option<String>,
    pub counterpart_pronouns: Option<String>,
    pub counterpart_email: Option<String>,
}

/// What happened when a student claimed a slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationOutcome {
    pub appointment: Appointment,
    pub status: AppointmentStatus,
    pub confirmation_sent: bool,
    pub cascaded: Option<crate::scheduling::QuotaScope>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppointmentComment {
    pub id: i64,
    pub appointment_id: i64,
    pub user_id: i64,
    pub appointment_comment: String,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentView {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub title: Option<String>,
    pub pronouns: Option<String>,
    pub appointment_comment: String,
    pub created_at: DateTime<Utc>,
}
