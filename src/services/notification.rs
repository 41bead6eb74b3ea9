//! Notification service implementation
//!
//! This service composes appointment confirmation emails and hands them to an
//! HTTP mail relay. Each recipient gets their own message with the meeting
//! attached as an iCalendar file.

use std::time::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn, debug};
use crate::config::settings::{NotificationConfig, Settings};
use crate::models::{Appointment, ProgramDetails, User};
use crate::services::calendar::{CalendarService, MeetingSummary};
use crate::utils::errors::{MentorWebError, NotificationError, NotificationResult, Result};
use crate::utils::helpers::{format_meeting_date, format_time_range, generate_uuid};

/// File attached to a relayed message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

/// Message body accepted by the mail relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayMessage {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub attachments: Vec<RelayAttachment>,
}

/// Notification service for appointment emails
#[derive(Clone, Debug)]
pub struct NotificationService {
    client: Client,
    config: NotificationConfig,
    calendar: CalendarService,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.notification.timeout_seconds))
            .user_agent(concat!("MentorWeb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MentorWebError::Http)?;

        Ok(Self {
            client,
            config: settings.notification.clone(),
            calendar: CalendarService::new(settings.scheduling.utc_offset_minutes)?,
        })
    }

    /// Check if delivery is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send the booking confirmation to the student and the host.
    ///
    /// Returns `Ok(false)` without contacting the relay when delivery is disabled.
    /// Both recipients are always attempted; the call fails only when neither
    /// message went out, and a partial delivery still counts as sent.
    pub async fn send_confirmation(
        &self,
        appointment: &Appointment,
        program: &ProgramDetails,
        student: &User,
        host: &User,
    ) -> Result<bool> {
        if !self.config.enabled {
            info!(appointment_id = appointment.id, "Notifications disabled, skipping confirmation");
            return Ok(false);
        }

        let meeting = MeetingSummary::new(appointment, program, host);
        let ics = self.calendar.generate_ics(&meeting)?;
        let calendar_link = self.calendar.add_to_calendar_url(&meeting)?;

        let mut delivered = 0;
        let mut first_error = None;
        for (recipient, counterpart) in [(student, host), (host, student)] {
            let result = match self.compose_confirmation(appointment, program, recipient, counterpart, &ics, &calendar_link) {
                Ok(message) => self.deliver(&message).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(appointment_id = appointment.id, recipient_id = recipient.id, error = %e, "Confirmation not delivered");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if delivered == 0 => Err(e.into()),
            Some(_) => {
                warn!(
                    appointment_id = appointment.id,
                    student_id = student.id,
                    host_id = host.id,
                    delivered = delivered,
                    "Appointment confirmation partly delivered"
                );
                Ok(true)
            }
            None => {
                info!(
                    appointment_id = appointment.id,
                    student_id = student.id,
                    host_id = host.id,
                    "Appointment confirmation sent"
                );
                Ok(true)
            }
        }
    }

    /// Build the confirmation message for one recipient
    pub fn compose_confirmation(
        &self,
        appointment: &Appointment,
        program: &ProgramDetails,
        recipient: &User,
        counterpart: &User,
        ics: &str,
        calendar_link: &str,
    ) -> NotificationResult<RelayMessage> {
        if recipient.email.trim().is_empty() {
            return Err(NotificationError::MissingRecipient(recipient.id));
        }

        let when = format!(
            "{}, {}",
            format_meeting_date(appointment.appointment_date),
            format_time_range(appointment.start_time, appointment.end_time)
        );

        let mut text = format!(
            "Hi {},\n\nYour {} appointment with {} is confirmed.\n\nWhen: {}\n",
            recipient.name, program.name, counterpart.name, when
        );

        if let Some(location) = &appointment.physical_location {
            text.push_str(&format!("Where: {}\n", location));
        }

        if let Some(url) = &appointment.meeting_url {
            text.push_str(&format!("Meeting link: {}\n", url));
        }

        if let Some(notes) = &appointment.notes {
            text.push_str(&format!("Notes: {}\n", notes));
        }

        text.push_str(&format!("\nAdd to Google Calendar: {}\n", calendar_link));

        Ok(RelayMessage {
            message_id: generate_uuid(),
            from: self.config.sender.clone(),
            to: recipient.email.clone(),
            subject: format!("Appointment confirmed: {} on {}", program.name, format_meeting_date(appointment.appointment_date)),
            text,
            attachments: vec![RelayAttachment {
                filename: "appointment.ics".to_string(),
                content_type: "text/calendar; charset=utf-8; method=PUBLISH".to_string(),
                content: ics.to_string(),
            }],
        })
    }

    /// Post one message to the relay
    async fn deliver(&self, message: &RelayMessage) -> NotificationResult<()> {
        debug!(to = %message.to, message_id = %message.message_id, "Posting message to mail relay");

        let mut request = self.client.post(&self.config.api_url).json(message);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotificationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(to = %message.to, status = status.as_u16(), "Mail relay rejected message");
            return Err(NotificationError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
