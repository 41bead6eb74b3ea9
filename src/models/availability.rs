//! Availability model

use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveTime};
use sqlx::FromRow;
use crate::scheduling::AvailabilityWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "availability_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Active,
    Inactive,
}

impl std::str::FromStr for AvailabilityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AvailabilityStatus::Active),
            "inactive" => Ok(AvailabilityStatus::Inactive),
            other => Err(format!("unknown availability status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Availability {
    pub id: i64,
    pub user_id: i64,
    pub program_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AvailabilityStatus,
}

impl Availability {
    pub fn window(&self) -> AvailabilityWindow {
        AvailabilityWindow {
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub user_id: i64,
    pub program_id: i64,
    pub window: AvailabilityWindow,
}

/// One window in a batch, as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    /// Program the window is posted for
    pub id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

/// Batch of windows sharing slot settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostAvailabilityRequest {
    pub course_id: Option<i64>,
    pub availabilities: Vec<AvailabilityEntry>,
    pub duration: Option<i32>,
    pub physical_location: Option<String>,
    pub meeting_url: Option<String>,
}

/// Result of a single batch entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EntryOutcome {
    Created { availability_id: i64, slots: usize },
    Rejected { reason: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub entries: Vec<EntryOutcome>,
}

impl BatchReport {
    pub fn created(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Created { .. }))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.entries.len() - self.created()
    }
}

/// Availability joined with its program, for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AvailabilityListing {
    pub id: i64,
    pub program_id: i64,
    pub name: String,
    pub course_id: Option<i64>,
    pub course_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AvailabilityStatus,
    pub is_dropins: bool,
}
