//! Appointment repository implementation

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{PgConnection, PgPool};
use crate::models::appointment::{Appointment, AppointmentListing, AppointmentStatus, CreateAppointmentRequest, MeetingFilter};
use crate::utils::errors::MentorWebError;

const APPOINTMENT_COLUMNS: &str = "id, instructor_id, attendee_id, availability_id, course_id, appointment_date, \
    start_time, end_time, status, notes, physical_location, meeting_url";

/// Which side of the appointment a listing is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Attendee,
    Host,
}

#[derive(Clone, Debug)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert posted slots for an availability inside the caller's transaction
    pub async fn create_slots(&self, conn: &mut PgConnection, slots: Vec<CreateAppointmentRequest>) -> Result<usize, MentorWebError> {
        let count = slots.len();
        for slot in slots {
            sqlx::query(
                r#"
                INSERT INTO appointments (instructor_id, availability_id, appointment_date, start_time, end_time,
                                          status, physical_location, meeting_url)
                VALUES ($1, $2, $3, $4, $5, 'posted', $6, $7)
                "#
            )
            .bind(slot.instructor_id)
            .bind(slot.availability_id)
            .bind(slot.appointment_date)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .bind(slot.physical_location)
            .bind(slot.meeting_url)
            .execute(&mut *conn)
            .await?;
        }

        Ok(count)
    }

    /// Find appointment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, MentorWebError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Find appointment by ID inside the caller's transaction, without locking it
    pub async fn find_by_id_in(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Appointment>, MentorWebError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(appointment)
    }

    /// Find and row-lock an appointment for the rest of the transaction
    pub async fn find_for_update(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Appointment>, MentorWebError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(appointment)
    }

    /// Slots generated for an availability
    pub async fn find_by_availability(&self, availability_id: i64) -> Result<Vec<Appointment>, MentorWebError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE availability_id = $1 ORDER BY start_time ASC"
        ))
        .bind(availability_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    /// Count a host's reserved and pending appointments between two dates (inclusive)
    pub async fn count_held_between(&self, conn: &mut PgConnection, instructor_id: i64, from: NaiveDate, to: NaiveDate) -> Result<i64, MentorWebError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM appointments
            WHERE instructor_id = $1 AND appointment_date BETWEEN $2 AND $3
              AND status IN ('reserved', 'pending')
            "#
        )
        .bind(instructor_id)
        .bind(from)
        .bind(to)
        .fetch_one(conn)
        .await?;

        Ok(count.0)
    }

    /// Attach a student to a slot
    pub async fn assign_attendee(
        &self,
        conn: &mut PgConnection,
        id: i64,
        attendee_id: i64,
        course_id: Option<i64>,
        notes: Option<String>,
        status: AppointmentStatus,
    ) -> Result<Appointment, MentorWebError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE appointments
            SET attendee_id = $2, course_id = $3, notes = $4, status = $5
            WHERE id = $1
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(attendee_id)
        .bind(course_id)
        .bind(notes)
        .bind(status)
        .fetch_one(conn)
        .await?;

        Ok(appointment)
    }

    /// Update appointment status
    pub async fn set_status(&self, conn: &mut PgConnection, id: i64, status: AppointmentStatus) -> Result<Appointment, MentorWebError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "UPDATE appointments SET status = $2 WHERE id = $1 RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_one(conn)
        .await?;

        Ok(appointment)
    }

    /// Put a slot back on offer, dropping the student's claim
    pub async fn release(&self, conn: &mut PgConnection, id: i64) -> Result<Appointment, MentorWebError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE appointments
            SET status = 'posted', attendee_id = NULL, course_id = NULL, notes = NULL
            WHERE id = $1
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_one(conn)
        .await?;

        Ok(appointment)
    }

    /// Deactivate a host's posted slots between two dates (inclusive)
    pub async fn deactivate_posted_between(&self, conn: &mut PgConnection, instructor_id: i64, from: NaiveDate, to: NaiveDate) -> Result<u64, MentorWebError> {
        let result = sqlx::query(
            r#"
            UPDATE appointments SET status = 'inactive'
            WHERE instructor_id = $1 AND appointment_date BETWEEN $2 AND $3 AND status = 'posted'
            "#
        )
        .bind(instructor_id)
        .bind(from)
        .bind(to)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Move every slot of an availability from one status to another
    pub async fn transition_for_availability(
        &self,
        conn: &mut PgConnection,
        availability_id: i64,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<u64, MentorWebError> {
        let result = sqlx::query(
            "UPDATE appointments SET status = $3 WHERE availability_id = $1 AND status = $2"
        )
        .bind(availability_id)
        .bind(from)
        .bind(to)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Posted slots of a program dated after `after` whose program belongs to
    /// `course_id` (`None` for global programs)
    pub async fn list_available(&self, program_id: i64, course_id: Option<i64>, after: NaiveDate) -> Result<Vec<Appointment>, MentorWebError> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT a.id, a.instructor_id, a.attendee_id, a.availability_id, a.course_id, a.appointment_date,
                   a.start_time, a.end_time, a.status, a.notes, a.physical_location, a.meeting_url
            FROM appointments a
            INNER JOIN availabilities av ON av.id = a.availability_id
            INNER JOIN programs p ON p.id = av.program_id
            WHERE a.status = 'posted'
              AND p.id = $1
              AND p.course_id IS NOT DISTINCT FROM $2
              AND a.appointment_date > $3
            ORDER BY a.appointment_date ASC, a.start_time ASC
            "#
        )
        .bind(program_id)
        .bind(course_id)
        .bind(after)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    /// Appointments a user takes part in, joined with the other party
    pub async fn list_for_participant(
        &self,
        participant: Participant,
        user_id: i64,
        filter: MeetingFilter,
        now: NaiveDateTime,
    ) -> Result<Vec<AppointmentListing>, MentorWebError> {
        let (owner_column, counterpart_column) = match participant {
            Participant::Attendee => ("a.attendee_id", "a.instructor_id"),
            Participant::Host => ("a.instructor_id", "a.attendee_id"),
        };

        let sql = format!(
            r#"
            SELECT a.id AS appointment_id, p.id AS program_id, p.name, c.course_name,
                   a.appointment_date AS date, a.start_time, a.end_time, a.status, a.notes,
                   a.physical_location, a.meeting_url,
                   u.name AS counterpart_name, u.title AS counterpart_title,
                   u.pronouns AS counterpart_pronouns, u.email AS counterpart_email
            FROM appointments a
            INNER JOIN availabilities av ON av.id = a.availability_id
            INNER JOIN programs p ON p.id = av.program_id
            LEFT JOIN courses c ON c.id = a.course_id
            LEFT JOIN users u ON u.id = {counterpart_column}
            WHERE {owner_column} = $1 AND {filter_clause}
            ORDER BY a.appointment_date ASC, a.start_time ASC
            "#,
            filter_clause = filter_clause(filter),
        );

        let listings = sqlx::query_as::<_, AppointmentListing>(&sql)
            .bind(user_id)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }
}

/// SQL condition for a listing filter; `$2` is the current local time
fn filter_clause(filter: MeetingFilter) -> &'static str {
    match filter {
        MeetingFilter::All => "($2::timestamp IS NOT NULL)",
        MeetingFilter::Upcoming => "(a.appointment_date + a.start_time) > $2 AND a.status = 'reserved'",
        MeetingFilter::Pending => "(a.appointment_date + a.start_time) > $2 AND a.status = 'pending'",
        MeetingFilter::Past => {
            "(a.appointment_date + a.start_time) <= $2 \
             AND a.status IN ('reserved', 'completed', 'rejected', 'missed', 'canceled')"
        }
    }
}
