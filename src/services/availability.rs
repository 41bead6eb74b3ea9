//! Availability service implementation
//!
//! This service lets hosts post availability windows for their programs,
//! splits them into bookable slots, and switches them on and off.

use std::sync::Arc;
use chrono::Duration;
use tracing::{info, warn, debug};
use crate::config::settings::{SchedulingConfig, Settings};
use crate::database::DatabaseService;
use crate::models::*;
use crate::scheduling::{first_exhausted_scope, generate_slots, validate_window, AvailabilityWindow, Clock};
use crate::utils::errors::{MentorWebError, Result};
use crate::utils::helpers::non_blank;
use crate::utils::logging::{log_availability_action, log_rejected_entry};

/// Availability service for hosts
#[derive(Clone)]
pub struct AvailabilityService {
    db: DatabaseService,
    clock: Arc<dyn Clock>,
    scheduling: SchedulingConfig,
}

impl AvailabilityService {
    /// Create a new AvailabilityService instance
    pub fn new(db: DatabaseService, clock: Arc<dyn Clock>, settings: &Settings) -> Self {
        Self {
            db,
            clock,
            scheduling: settings.scheduling.clone(),
        }
    }

    /// Post a batch of windows. Entries are handled one by one, each in its own
    /// transaction, and a bad entry never blocks the rest.
    pub async fn create_availabilities(&self, host_id: i64, request: PostAvailabilityRequest) -> Result<BatchReport> {
        let host = self.require_host(host_id).await?;
        debug!(host_id = host.id, entries = request.availabilities.len(), "Creating availabilities");

        let mut report = BatchReport::default();
        for entry in &request.availabilities {
            let outcome = match self.create_entry(&host, &request, entry).await {
                Ok((availability_id, slots)) => EntryOutcome::Created { availability_id, slots },
                Err(e) => {
                    log_rejected_entry(host.id, entry.id, &e.to_string());
                    EntryOutcome::Rejected { reason: e.to_string() }
                }
            };
            report.entries.push(outcome);
        }

        info!(
            host_id = host.id,
            created = report.created(),
            rejected = report.rejected(),
            "Availability batch processed"
        );
        Ok(report)
    }

    async fn create_entry(&self, host: &User, request: &PostAvailabilityRequest, entry: &AvailabilityEntry) -> Result<(i64, usize)> {
        let program = self.db.require_program(entry.id).await?;
        if program.instructor_id != host.id {
            return Err(MentorWebError::PermissionDenied(format!(
                "program {} does not belong to user {}",
                program.id, host.id
            )));
        }

        if !program.is_dropins {
            if let Some(course_id) = request.course_id {
                self.db.programs.find_owned_course(course_id, host.id).await?
                    .ok_or(MentorWebError::CourseNotFound { course_id })?;
            }
        }

        let window = AvailabilityWindow::parse(&entry.date, &entry.start_time, &entry.end_time)?;
        validate_window(&window, self.clock.today(), Duration::minutes(self.scheduling.min_window_minutes))?;

        let mut tx = self.db.begin().await?;

        let same_day = self.db.availabilities.find_same_day(&mut *tx, host.id, program.id, window.date).await?;
        if same_day.iter().any(|existing| existing.window().overlaps(&window)) {
            return Err(MentorWebError::AvailabilityConflict);
        }

        if !window.starts_in_future(self.clock.now()) {
            return Err(MentorWebError::InvalidInput("availability must start in the future".to_string()));
        }

        let availability = self.db.availabilities.create(&mut *tx, CreateAvailabilityRequest {
            user_id: host.id,
            program_id: program.id,
            window,
        }).await?;

        let mut slot_count = 0;
        if !program.is_dropins {
            let duration = request.duration
                .or(program.duration)
                .or(self.scheduling.default_slot_minutes);
            let physical_location = non_blank(request.physical_location.clone()).or_else(|| program.physical_location.clone());
            let meeting_url = non_blank(request.meeting_url.clone()).or_else(|| program.meeting_url.clone());

            let slots = generate_slots(&window, duration)?
                .into_iter()
                .map(|slot| CreateAppointmentRequest {
                    instructor_id: host.id,
                    availability_id: availability.id,
                    appointment_date: window.date,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    physical_location: physical_location.clone(),
                    meeting_url: meeting_url.clone(),
                })
                .collect();

            slot_count = self.db.appointments.create_slots(&mut *tx, slots).await?;
        }

        tx.commit().await?;

        log_availability_action(availability.id, host.id, "created", Some(&format!("{} slots", slot_count)));
        Ok((availability.id, slot_count))
    }

    /// Switch an availability on or off together with its open slots
    pub async fn set_availability_status(&self, host_id: i64, availability_id: i64, status: AvailabilityStatus) -> Result<Availability> {
        let mut tx = self.db.begin().await?;

        // Same lock order as a booking: host, then availability, then slots
        self.db.lock_host(&mut *tx, host_id).await?;

        let availability = match self.db.availabilities.find_owned_for_update(&mut *tx, availability_id, host_id).await? {
            Some(availability) => availability,
            None => {
                tx.rollback().await?;
                return Err(self.missing_or_foreign(availability_id, host_id).await);
            }
        };

        let (updated, moved) = match status {
            AvailabilityStatus::Inactive => {
                let updated = self.db.availabilities.set_status(&mut *tx, availability.id, AvailabilityStatus::Inactive).await?;
                let moved = self.db.appointments
                    .transition_for_availability(&mut *tx, availability.id, AppointmentStatus::Posted, AppointmentStatus::Inactive)
                    .await?;
                (updated, moved)
            }
            AvailabilityStatus::Active => {
                let program = self.db.require_program_in(&mut *tx, availability.program_id).await?;
                let counts = self.db.quota_counts(&mut *tx, availability.user_id, availability.date).await?;

                if let Some(scope) = first_exhausted_scope(&program.quota_limits(), &counts) {
                    warn!(availability_id = availability.id, scope = scope.as_str(), "Reactivation refused, meeting limit reached");
                    return Err(MentorWebError::LimitReached(scope));
                }

                let updated = self.db.availabilities.set_status(&mut *tx, availability.id, AvailabilityStatus::Active).await?;
                let moved = self.db.appointments
                    .transition_for_availability(&mut *tx, availability.id, AppointmentStatus::Inactive, AppointmentStatus::Posted)
                    .await?;
                (updated, moved)
            }
        };

        tx.commit().await?;

        let details = format!("{} slots moved", moved);
        let action = match status {
            AvailabilityStatus::Active => "activated",
            AvailabilityStatus::Inactive => "deactivated",
        };
        log_availability_action(updated.id, host_id, action, Some(&details));
        Ok(updated)
    }

    /// Remove an availability and every slot generated from it
    pub async fn delete_availability(&self, host_id: i64, availability_id: i64) -> Result<()> {
        let mut tx = self.db.begin().await?;
        self.db.lock_host(&mut *tx, host_id).await?;

        let deleted = self.db.availabilities.delete_owned(&mut *tx, availability_id, host_id).await?;
        tx.commit().await?;

        if deleted == 0 {
            return Err(self.missing_or_foreign(availability_id, host_id).await);
        }

        log_availability_action(availability_id, host_id, "deleted", None);
        Ok(())
    }

    /// Host's upcoming windows for programs of a course, or for global programs
    pub async fn list_availabilities(&self, host_id: i64, course_id: Option<i64>) -> Result<Vec<AvailabilityListing>> {
        self.require_host(host_id).await?;
        self.db.availabilities.list_for_host(host_id, course_id, self.clock.today()).await
    }

    /// Active drop-in windows a student of the course can walk into
    pub async fn list_dropin_windows(&self, course_id: i64) -> Result<Vec<AvailabilityListing>> {
        let course = self.db.programs.find_course(course_id).await?
            .ok_or(MentorWebError::CourseNotFound { course_id })?;

        let program_ids: Vec<i64> = self.db.programs.find_dropins_for_course(&course).await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        if program_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.db.availabilities.list_active_for_programs(&program_ids, self.clock.today()).await
    }

    /// Slots generated for an availability
    pub async fn slots(&self, availability_id: i64) -> Result<Vec<Appointment>> {
        self.db.appointments.find_by_availability(availability_id).await
    }

    async fn require_host(&self, host_id: i64) -> Result<User> {
        let host = self.db.require_user(host_id).await?;
        if !host.account_type.can_host() {
            return Err(MentorWebError::PermissionDenied(format!(
                "{} accounts cannot post availability",
                host.account_type
            )));
        }

        Ok(host)
    }

    async fn missing_or_foreign(&self, availability_id: i64, host_id: i64) -> MentorWebError {
        match self.db.availabilities.find_by_id(availability_id).await {
            Ok(Some(_)) => MentorWebError::PermissionDenied(format!(
                "availability {} does not belong to user {}",
                availability_id, host_id
            )),
            Ok(None) => MentorWebError::AvailabilityNotFound { availability_id },
            Err(e) => e,
        }
    }
}
