//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Format a meeting date for people, e.g. "Tuesday, March 26, 2024"
pub fn format_meeting_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Format a meeting time on a 12 hour clock, e.g. "2:30 PM"
pub fn format_meeting_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Format a time range, e.g. "10:00 AM - 10:30 AM"
pub fn format_time_range(start: NaiveTime, end: NaiveTime) -> String {
    format!("{} - {}", format_meeting_time(start), format_meeting_time(end))
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.') && email.len() > 5
}

/// Treat blank optional strings as missing
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
