//! Calendar export
//!
//! This service renders confirmed appointments as iCalendar attachments and
//! "Add to Calendar" links. Appointment times are stored on the campus clock,
//! so both outputs convert them to UTC using the configured offset.

use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::models::{Appointment, ProgramDetails, User};
use crate::scheduling::LocalClock;
use crate::utils::errors::{MentorWebError, Result};

const UTC_STAMP: &str = "%Y%m%dT%H%M%SZ";

/// What a calendar entry needs to know about a meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub appointment_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub location: Option<String>,
    pub meeting_url: Option<String>,
}

impl MeetingSummary {
    pub fn new(appointment: &Appointment, program: &ProgramDetails, host: &User) -> Self {
        Self {
            appointment_id: appointment.id,
            title: format!("{} with {}", program.name, host.name),
            description: appointment.notes.clone().or_else(|| program.description.clone()),
            starts_at: appointment.starts_at(),
            ends_at: appointment.ends_at(),
            location: appointment.physical_location.clone(),
            meeting_url: appointment.meeting_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalendarService {
    offset: FixedOffset,
}

impl CalendarService {
    /// Create a new CalendarService for the campus UTC offset
    pub fn new(utc_offset_minutes: i32) -> Result<Self> {
        let clock = LocalClock::new(utc_offset_minutes).ok_or_else(|| {
            MentorWebError::Config(format!("invalid UTC offset: {} minutes", utc_offset_minutes))
        })?;

        Ok(Self { offset: clock.offset() })
    }

    fn to_utc_stamp(&self, local: NaiveDateTime) -> Result<String> {
        let instant = self.offset.from_local_datetime(&local).single().ok_or_else(|| {
            MentorWebError::InvalidInput(format!("ambiguous local time: {}", local))
        })?;

        Ok(instant.with_timezone(&Utc).format(UTC_STAMP).to_string())
    }

    /// Generate an iCalendar document with a single event
    pub fn generate_ics(&self, meeting: &MeetingSummary) -> Result<String> {
        debug!(appointment_id = meeting.appointment_id, "Generating iCal attachment");

        let mut ical = String::new();
        ical.push_str("BEGIN:VCALENDAR\r\n");
        ical.push_str("VERSION:2.0\r\n");
        ical.push_str("PRODID:-//MentorWeb//Appointments//EN\r\n");
        ical.push_str("METHOD:PUBLISH\r\n");
        ical.push_str("BEGIN:VEVENT\r\n");
        ical.push_str(&format!("UID:mentorweb-appointment-{}\r\n", meeting.appointment_id));
        ical.push_str(&format!("DTSTAMP:{}\r\n", Utc::now().format(UTC_STAMP)));
        ical.push_str(&format!("DTSTART:{}\r\n", self.to_utc_stamp(meeting.starts_at)?));
        ical.push_str(&format!("DTEND:{}\r\n", self.to_utc_stamp(meeting.ends_at)?));
        ical.push_str(&format!("SUMMARY:{}\r\n", escape_text(&meeting.title)));

        if let Some(description) = &meeting.description {
            ical.push_str(&format!("DESCRIPTION:{}\r\n", escape_text(description)));
        }

        if let Some(location) = &meeting.location {
            ical.push_str(&format!("LOCATION:{}\r\n", escape_text(location)));
        }

        if let Some(url) = &meeting.meeting_url {
            ical.push_str(&format!("URL:{}\r\n", url));
        }

        ical.push_str("STATUS:CONFIRMED\r\n");
        ical.push_str("END:VEVENT\r\n");
        ical.push_str("END:VCALENDAR\r\n");

        Ok(ical)
    }

    /// Generate "Add to Calendar" URL for a meeting
    pub fn add_to_calendar_url(&self, meeting: &MeetingSummary) -> Result<String> {
        let mut url = "https://calendar.google.com/calendar/render?action=TEMPLATE".to_string();

        url.push_str(&format!("&text={}", urlencoding::encode(&meeting.title)));
        url.push_str(&format!(
            "&dates={}/{}",
            self.to_utc_stamp(meeting.starts_at)?,
            self.to_utc_stamp(meeting.ends_at)?
        ));

        if let Some(description) = &meeting.description {
            url.push_str(&format!("&details={}", urlencoding::encode(description)));
        }

        if let Some(location) = meeting.location.as_ref().or(meeting.meeting_url.as_ref()) {
            url.push_str(&format!("&location={}", urlencoding::encode(location)));
        }

        Ok(url)
    }
}

/// Escape TEXT values per RFC 5545
fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}
