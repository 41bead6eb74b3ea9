//! Campus clock
//!
//! Appointment dates and times are stored as local wall-clock values, so every
//! "is this in the past" decision needs the local time of the campus, not UTC.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock shifted by a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    offset: FixedOffset,
}

impl LocalClock {
    pub fn new(utc_offset_minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(utc_offset_minutes * 60).map(|offset| Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
