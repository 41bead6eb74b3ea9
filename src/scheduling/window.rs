//! Availability window validation

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use crate::utils::errors::{MentorWebError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Time range on a single day during which a host is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    /// Parse the wire representation (`YYYY-MM-DD`, `HH:MM`, `HH:MM`)
    pub fn parse(date: &str, start_time: &str, end_time: &str) -> Result<Self> {
        Ok(Self {
            date: parse_date(date)?,
            start_time: parse_time(start_time)?,
            end_time: parse_time(end_time)?,
        })
    }

    pub fn length(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// Half-open overlap on the same day
    pub fn overlaps(&self, other: &AvailabilityWindow) -> bool {
        self.date == other.date
            && self.start_time < other.end_time
            && self.end_time > other.start_time
    }

    pub fn contains(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start >= self.start_time && end <= self.end_time && start < end
    }

    pub fn starts_in_future(&self, now: NaiveDateTime) -> bool {
        self.starts_at() > now
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        MentorWebError::InvalidInput(format!("provide a valid 'YYYY-MM-DD' date, got '{}'", value))
    })
}

pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        MentorWebError::InvalidInput(format!("provide a valid 'HH:MM' time, got '{}'", value))
    })
}

/// Check that a window is not in the past and is long enough
pub fn validate_window(window: &AvailabilityWindow, today: NaiveDate, min_length: Duration) -> Result<()> {
    if window.date < today {
        return Err(MentorWebError::InvalidInput(
            "provide a date that is not in the past".to_string(),
        ));
    }

    if window.start_time >= window.end_time || window.length() < min_length {
        return Err(MentorWebError::InvalidInput(format!(
            "start_time must be before end_time and at least {} minutes apart",
            min_length.num_minutes()
        )));
    }

    Ok(())
}
