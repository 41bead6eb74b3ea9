//! Availability repository implementation

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use crate::models::availability::{Availability, AvailabilityListing, AvailabilityStatus, CreateAvailabilityRequest};
use crate::utils::errors::MentorWebError;

const AVAILABILITY_COLUMNS: &str = "id, user_id, program_id, date, start_time, end_time, status";

#[derive(Clone, Debug)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an active availability inside the caller's transaction
    pub async fn create(&self, conn: &mut PgConnection, request: CreateAvailabilityRequest) -> Result<Availability, MentorWebError> {
        let availability = sqlx::query_as::<_, Availability>(&format!(
            r#"
            INSERT INTO availabilities (user_id, program_id, date, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5, 'active')
            RETURNING {AVAILABILITY_COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(request.program_id)
        .bind(request.window.date)
        .bind(request.window.start_time)
        .bind(request.window.end_time)
        .fetch_one(conn)
        .await?;

        Ok(availability)
    }

    /// Find availability by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Availability>, MentorWebError> {
        let availability = sqlx::query_as::<_, Availability>(&format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM availabilities WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(availability)
    }

    /// Lock an availability owned by `user_id`
    pub async fn find_owned_for_update(&self, conn: &mut PgConnection, id: i64, user_id: i64) -> Result<Option<Availability>, MentorWebError> {
        let availability = sqlx::query_as::<_, Availability>(&format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM availabilities WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(availability)
    }

    /// Windows the host already posted for a program on a given day
    pub async fn find_same_day(&self, conn: &mut PgConnection, user_id: i64, program_id: i64, date: NaiveDate) -> Result<Vec<Availability>, MentorWebError> {
        let availabilities = sqlx::query_as::<_, Availability>(&format!(
            r#"
            SELECT {AVAILABILITY_COLUMNS} FROM availabilities
            WHERE user_id = $1 AND program_id = $2 AND date = $3
            ORDER BY start_time ASC
            "#
        ))
        .bind(user_id)
        .bind(program_id)
        .bind(date)
        .fetch_all(conn)
        .await?;

        Ok(availabilities)
    }

    /// Update availability status
    pub async fn set_status(&self, conn: &mut PgConnection, id: i64, status: AvailabilityStatus) -> Result<Availability, MentorWebError> {
        let availability = sqlx::query_as::<_, Availability>(&format!(
            "UPDATE availabilities SET status = $2 WHERE id = $1 RETURNING {AVAILABILITY_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_one(conn)
        .await?;

        Ok(availability)
    }

    /// Deactivate every window of a host between two dates (inclusive)
    pub async fn deactivate_between(&self, conn: &mut PgConnection, user_id: i64, from: NaiveDate, to: NaiveDate) -> Result<u64, MentorWebError> {
        let result = sqlx::query(
            r#"
            UPDATE availabilities SET status = 'inactive'
            WHERE user_id = $1 AND date BETWEEN $2 AND $3 AND status <> 'inactive'
            "#
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete an availability owned by `user_id`; its slots go with it
    pub async fn delete_owned(&self, conn: &mut PgConnection, id: i64, user_id: i64) -> Result<u64, MentorWebError> {
        let result = sqlx::query("DELETE FROM availabilities WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Host's windows after `after` for programs of a course, or for global
    /// programs when `course_id` is `None`
    pub async fn list_for_host(&self, user_id: i64, course_id: Option<i64>, after: NaiveDate) -> Result<Vec<AvailabilityListing>, MentorWebError> {
        let listings = sqlx::query_as::<_, AvailabilityListing>(
            r#"
            SELECT a.id, a.program_id, p.name, p.course_id, c.course_name,
                   a.date, a.start_time, a.end_time, a.status, p.is_dropins
            FROM availabilities a
            INNER JOIN programs p ON p.id = a.program_id
            LEFT JOIN courses c ON c.id = p.course_id
            WHERE a.user_id = $1 AND a.date > $3 AND p.course_id IS NOT DISTINCT FROM $2
            ORDER BY a.date ASC, a.start_time ASC
            "#
        )
        .bind(user_id)
        .bind(course_id)
        .bind(after)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    /// Active windows of the given programs from `from` on
    pub async fn list_active_for_programs(&self, program_ids: &[i64], from: NaiveDate) -> Result<Vec<AvailabilityListing>, MentorWebError> {
        let listings = sqlx::query_as::<_, AvailabilityListing>(
            r#"
            SELECT a.id, a.program_id, p.name, p.course_id, c.course_name,
                   a.date, a.start_time, a.end_time, a.status, p.is_dropins
            FROM availabilities a
            INNER JOIN programs p ON p.id = a.program_id
            LEFT JOIN courses c ON c.id = p.course_id
            WHERE a.program_id = ANY($1) AND a.date >= $2 AND a.status = 'active'
            ORDER BY a.date ASC, a.start_time ASC
            "#
        )
        .bind(program_ids)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }
}
