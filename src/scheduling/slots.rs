//! Slot generation
//!
//! Expands an availability window into back-to-back bookable slots.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use crate::utils::errors::{MentorWebError, Result};
use super::window::AvailabilityWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Split a window into slots of `duration_minutes`.
///
/// A missing or zero duration yields one slot covering the whole window. Any
/// tail shorter than a full slot is left unbooked.
pub fn generate_slots(window: &AvailabilityWindow, duration_minutes: Option<i32>) -> Result<Vec<SlotSpec>> {
    let minutes = match duration_minutes {
        None | Some(0) => {
            return Ok(vec![SlotSpec {
                start_time: window.start_time,
                end_time: window.end_time,
            }]);
        }
        Some(m) if m < 0 => {
            return Err(MentorWebError::InvalidInput(format!("slot duration cannot be negative: {}", m)));
        }
        Some(m) => m,
    };

    let step = Duration::minutes(i64::from(minutes));
    let mut slots = Vec::new();
    let mut start = window.start_time;

    // NaiveTime arithmetic wraps at midnight, so compare lengths instead of times.
    while window.end_time - start >= step {
        let end = start + step;
        slots.push(SlotSpec { start_time: start, end_time: end });
        start = end;
    }

    Ok(slots)
}
