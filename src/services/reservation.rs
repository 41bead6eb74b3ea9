//! Reservation service implementation
//!
//! This service moves appointments through their lifecycle: students claim
//! posted slots, hosts approve, cancel and record attendance. Every booking is
//! checked against the host's daily, weekly and monthly meeting limits, and a
//! host who runs out of room gets the rest of that period closed automatically.

use std::sync::Arc;
use chrono::NaiveDate;
use sqlx::PgConnection;
use tracing::{info, warn, debug};
use crate::database::{DatabaseService, Participant};
use crate::models::*;
use crate::scheduling::{evaluate_reservation, Clock, QuotaDecision, QuotaScope};
use crate::services::notification::NotificationService;
use crate::utils::errors::{MentorWebError, Result};
use crate::utils::helpers::non_blank;
use crate::utils::logging::{log_cascade, log_reservation};

/// Reservation service for students and hosts
#[derive(Clone)]
pub struct ReservationService {
    db: DatabaseService,
    clock: Arc<dyn Clock>,
    notifications: NotificationService,
}

impl ReservationService {
    /// Create a new ReservationService instance
    pub fn new(db: DatabaseService, clock: Arc<dyn Clock>, notifications: NotificationService) -> Self {
        Self { db, clock, notifications }
    }

    /// Claim a posted slot for a student.
    ///
    /// A booking that would go over a limit is refused with `LimitReached`, and
    /// the full period is closed for further bookings in the same step.
    pub async fn reserve(
        &self,
        student_id: i64,
        appointment_id: i64,
        course_id: Option<i64>,
        notes: Option<String>,
    ) -> Result<ReservationOutcome> {
        debug!(student_id = student_id, appointment_id = appointment_id, "Reserving appointment");

        let mut tx = self.db.begin().await?;

        // Host first, then the slot. The host never changes, so a plain read
        // is enough to find whom to lock.
        let host_id = self.db.appointments.find_by_id_in(&mut *tx, appointment_id).await?
            .ok_or(MentorWebError::AppointmentNotFound { appointment_id })?
            .instructor_id;
        self.db.lock_host(&mut *tx, host_id).await?;

        let appointment = self.db.appointments.find_for_update(&mut *tx, appointment_id).await?
            .ok_or(MentorWebError::AppointmentNotFound { appointment_id })?;

        if appointment.status != AppointmentStatus::Posted {
            return Err(MentorWebError::NotReservable(format!("appointment is {}", appointment.status)));
        }

        let student = self.db.require_user_in(&mut *tx, student_id).await?;
        if !student.account_type.can_book() {
            return Err(MentorWebError::PermissionDenied("only students can reserve appointments".to_string()));
        }

        if appointment.has_started(self.clock.now()) {
            return Err(MentorWebError::NotReservable("appointment is in the past".to_string()));
        }

        let program = self.program_for(&mut *tx, &appointment).await?;
        let counts = self.db.quota_counts(&mut *tx, appointment.instructor_id, appointment.appointment_date).await?;

        match evaluate_reservation(&program.quota_limits(), &counts) {
            QuotaDecision::Admit { cascade } => {
                let status = if program.auto_approve_appointments {
                    AppointmentStatus::Reserved
                } else {
                    AppointmentStatus::Pending
                };

                let reserved = self.db.appointments
                    .assign_attendee(&mut *tx, appointment.id, student.id, course_id, non_blank(notes), status)
                    .await?;

                if let Some(scope) = cascade {
                    self.cascade(&mut *tx, appointment.instructor_id, appointment.appointment_date, scope).await?;
                }

                tx.commit().await?;
                log_reservation(reserved.id, student.id, status, cascade);

                let confirmation_sent = if status == AppointmentStatus::Reserved {
                    self.confirm(&reserved, &program, &student).await
                } else {
                    false
                };

                Ok(ReservationOutcome {
                    appointment: reserved,
                    status,
                    confirmation_sent,
                    cascaded: cascade,
                })
            }
            QuotaDecision::Reject { breached } => {
                self.cascade(&mut *tx, appointment.instructor_id, appointment.appointment_date, breached).await?;
                tx.commit().await?;

                warn!(
                    appointment_id = appointment.id,
                    student_id = student.id,
                    scope = breached.as_str(),
                    "Reservation refused, meeting limit reached"
                );
                Err(MentorWebError::LimitReached(breached))
            }
        }
    }

    /// Student gives a slot back; it is offered to others again
    pub async fn cancel_by_student(&self, student_id: i64, appointment_id: i64) -> Result<Appointment> {
        let mut tx = self.db.begin().await?;

        let appointment = self.db.appointments.find_for_update(&mut *tx, appointment_id).await?
            .ok_or(MentorWebError::AppointmentNotFound { appointment_id })?;

        if appointment.attendee_id != Some(student_id) {
            return Err(MentorWebError::PermissionDenied(format!(
                "appointment {} is not reserved by user {}",
                appointment_id, student_id
            )));
        }

        self.ensure_cancellable(&appointment, AppointmentStatus::Posted)?;

        let released = self.db.appointments.release(&mut *tx, appointment.id).await?;
        tx.commit().await?;

        info!(appointment_id = appointment.id, student_id = student_id, "Appointment canceled by student");
        Ok(released)
    }

    /// Host calls off a booked meeting
    pub async fn cancel_by_host(&self, host_id: i64, appointment_id: i64) -> Result<Appointment> {
        let mut tx = self.db.begin().await?;

        let appointment = self.db.appointments.find_for_update(&mut *tx, appointment_id).await?
            .ok_or(MentorWebError::AppointmentNotFound { appointment_id })?;

        ensure_host(&appointment, host_id)?;
        self.ensure_cancellable(&appointment, AppointmentStatus::Canceled)?;

        let canceled = self.db.appointments.set_status(&mut *tx, appointment.id, AppointmentStatus::Canceled).await?;
        tx.commit().await?;

        info!(appointment_id = appointment.id, host_id = host_id, "Appointment canceled by host");
        Ok(canceled)
    }

    /// Confirm a pending booking
    pub async fn approve(&self, host_id: i64, appointment_id: i64) -> Result<ReservationOutcome> {
        let mut tx = self.db.begin().await?;

        let appointment = self.pending_for_host(&mut *tx, host_id, appointment_id, AppointmentStatus::Reserved).await?;
        if appointment.has_started(self.clock.now()) {
            return Err(MentorWebError::InvalidInput("appointment has already started".to_string()));
        }

        let program = self.program_for(&mut *tx, &appointment).await?;
        let student = match appointment.attendee_id {
            Some(student_id) => Some(self.db.require_user_in(&mut *tx, student_id).await?),
            None => None,
        };

        let approved = self.db.appointments.set_status(&mut *tx, appointment.id, AppointmentStatus::Reserved).await?;
        tx.commit().await?;

        info!(appointment_id = approved.id, host_id = host_id, "Appointment approved");

        let confirmation_sent = match &student {
            Some(student) => self.confirm(&approved, &program, student).await,
            None => {
                warn!(appointment_id = approved.id, "Approved appointment has no attendee, confirmation not sent");
                false
            }
        };

        Ok(ReservationOutcome {
            status: approved.status,
            appointment: approved,
            confirmation_sent,
            cascaded: None,
        })
    }

    /// Turn down a pending booking
    pub async fn reject(&self, host_id: i64, appointment_id: i64) -> Result<Appointment> {
        let mut tx = self.db.begin().await?;

        let appointment = self.pending_for_host(&mut *tx, host_id, appointment_id, AppointmentStatus::Rejected).await?;
        let rejected = self.db.appointments.set_status(&mut *tx, appointment.id, AppointmentStatus::Rejected).await?;
        tx.commit().await?;

        info!(appointment_id = rejected.id, host_id = host_id, "Appointment rejected");
        Ok(rejected)
    }

    /// Mark a reserved meeting that has started as completed or missed
    pub async fn record_attendance(&self, host_id: i64, appointment_id: i64, attended: bool) -> Result<Appointment> {
        let target = if attended { AppointmentStatus::Completed } else { AppointmentStatus::Missed };
        let mut tx = self.db.begin().await?;

        let appointment = self.db.appointments.find_for_update(&mut *tx, appointment_id).await?
            .ok_or(MentorWebError::AppointmentNotFound { appointment_id })?;

        ensure_host(&appointment, host_id)?;

        if appointment.status != AppointmentStatus::Reserved {
            return Err(transition_error(appointment.status, target));
        }

        if !appointment.has_started(self.clock.now()) {
            return Err(MentorWebError::InvalidInput("appointment has not started yet".to_string()));
        }

        let updated = self.db.appointments.set_status(&mut *tx, appointment.id, target).await?;
        tx.commit().await?;

        info!(appointment_id = updated.id, host_id = host_id, status = %target, "Attendance recorded");
        Ok(updated)
    }

    /// Open slots of a program from tomorrow on
    pub async fn available_appointments(&self, program_id: i64, course_id: Option<i64>) -> Result<Vec<Appointment>> {
        let program = self.db.require_program(program_id).await?;
        let course_id = if program.is_global() { None } else { course_id };
        self.db.appointments.list_available(program.id, course_id, self.clock.today()).await
    }

    /// Appointments a student booked
    pub async fn list_for_student(&self, student_id: i64, filter: MeetingFilter) -> Result<Vec<AppointmentListing>> {
        self.db.appointments
            .list_for_participant(Participant::Attendee, student_id, filter, self.clock.now())
            .await
    }

    /// Appointments a host holds
    pub async fn list_for_host(&self, host_id: i64, filter: MeetingFilter) -> Result<Vec<AppointmentListing>> {
        self.db.appointments
            .list_for_participant(Participant::Host, host_id, filter, self.clock.now())
            .await
    }

    async fn cascade(&self, conn: &mut PgConnection, instructor_id: i64, date: NaiveDate, scope: QuotaScope) -> Result<()> {
        let (slots, windows) = self.db.cascade_deactivation(conn, instructor_id, date, scope).await?;
        log_cascade(instructor_id, date, scope, slots, windows);
        Ok(())
    }

    async fn program_for(&self, conn: &mut PgConnection, appointment: &Appointment) -> Result<ProgramDetails> {
        let availability_id = appointment.availability_id;
        self.db.programs.find_for_availability(conn, availability_id).await?
            .ok_or(MentorWebError::AvailabilityNotFound { availability_id })
    }

    async fn pending_for_host(
        &self,
        conn: &mut PgConnection,
        host_id: i64,
        appointment_id: i64,
        target: AppointmentStatus,
    ) -> Result<Appointment> {
        let appointment = self.db.appointments.find_for_update(conn, appointment_id).await?
            .ok_or(MentorWebError::AppointmentNotFound { appointment_id })?;

        ensure_host(&appointment, host_id)?;

        if appointment.status != AppointmentStatus::Pending {
            return Err(transition_error(appointment.status, target));
        }

        Ok(appointment)
    }

    fn ensure_cancellable(&self, appointment: &Appointment, target: AppointmentStatus) -> Result<()> {
        if !appointment.status.is_held() {
            return Err(transition_error(appointment.status, target));
        }

        if appointment.has_started(self.clock.now()) {
            return Err(MentorWebError::InvalidInput("cannot cancel an appointment that has already started".to_string()));
        }

        Ok(())
    }

    /// Send the confirmation; delivery problems are logged, never raised
    async fn confirm(&self, appointment: &Appointment, program: &ProgramDetails, student: &User) -> bool {
        let host = match self.db.require_user(appointment.instructor_id).await {
            Ok(host) => host,
            Err(e) => {
                warn!(appointment_id = appointment.id, error = %e, "Host lookup failed, confirmation not sent");
                return false;
            }
        };

        match self.notifications.send_confirmation(appointment, program, student, &host).await {
            Ok(sent) => sent,
            Err(e) => {
                warn!(appointment_id = appointment.id, error = %e, "Failed to send appointment confirmation");
                false
            }
        }
    }
}

fn ensure_host(appointment: &Appointment, host_id: i64) -> Result<()> {
    if appointment.instructor_id != host_id {
        return Err(MentorWebError::PermissionDenied(format!(
            "appointment {} is not hosted by user {}",
            appointment.id, host_id
        )));
    }

    Ok(())
}

fn transition_error(from: AppointmentStatus, to: AppointmentStatus) -> MentorWebError {
    MentorWebError::InvalidStateTransition {
        from: from.to_string(),
        to: to.to_string(),
    }
}
