//! Course and program repository implementation

use sqlx::{PgConnection, PgPool};
use crate::models::program::{Course, ProgramDetails, CreateCourseRequest, CreateProgramRequest};
use crate::utils::errors::MentorWebError;

const PROGRAM_COLUMNS: &str = "id, name, description, instructor_id, course_id, duration, physical_location, meeting_url, \
    auto_approve_appointments, max_daily_meetings, max_weekly_meetings, max_monthly_meetings, is_dropins, is_range_based";

#[derive(Clone, Debug)]
pub struct ProgramRepository {
    pool: PgPool,
}

impl ProgramRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new course
    pub async fn create_course(&self, request: CreateCourseRequest) -> Result<Course, MentorWebError> {
        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (course_name, instructor_id) VALUES ($1, $2) RETURNING id, course_name, instructor_id"
        )
        .bind(request.course_name)
        .bind(request.instructor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    /// Find course by ID
    pub async fn find_course(&self, id: i64) -> Result<Option<Course>, MentorWebError> {
        let course = sqlx::query_as::<_, Course>(
            "SELECT id, course_name, instructor_id FROM courses WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// Find a course owned by the given instructor
    pub async fn find_owned_course(&self, id: i64, instructor_id: i64) -> Result<Option<Course>, MentorWebError> {
        let course = sqlx::query_as::<_, Course>(
            "SELECT id, course_name, instructor_id FROM courses WHERE id = $1 AND instructor_id = $2"
        )
        .bind(id)
        .bind(instructor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// Create a new program
    pub async fn create(&self, request: CreateProgramRequest) -> Result<ProgramDetails, MentorWebError> {
        let program = sqlx::query_as::<_, ProgramDetails>(&format!(
            r#"
            INSERT INTO programs (name, description, instructor_id, course_id, duration, physical_location, meeting_url,
                                  auto_approve_appointments, max_daily_meetings, max_weekly_meetings, max_monthly_meetings, is_dropins)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PROGRAM_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.description)
        .bind(request.instructor_id)
        .bind(request.course_id)
        .bind(request.duration)
        .bind(request.physical_location)
        .bind(request.meeting_url)
        .bind(request.auto_approve_appointments)
        .bind(request.max_daily_meetings)
        .bind(request.max_weekly_meetings)
        .bind(request.max_monthly_meetings)
        .bind(request.is_dropins)
        .fetch_one(&self.pool)
        .await?;

        Ok(program)
    }

    /// Find program by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ProgramDetails>, MentorWebError> {
        let program = sqlx::query_as::<_, ProgramDetails>(&format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(program)
    }

    /// Find program by ID inside the caller's transaction
    pub async fn find_by_id_in(&self, conn: &mut PgConnection, id: i64) -> Result<Option<ProgramDetails>, MentorWebError> {
        let program = sqlx::query_as::<_, ProgramDetails>(&format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = $1"))
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(program)
    }

    /// Program an availability was posted for
    pub async fn find_for_availability(&self, conn: &mut PgConnection, availability_id: i64) -> Result<Option<ProgramDetails>, MentorWebError> {
        let program = sqlx::query_as::<_, ProgramDetails>(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = (SELECT program_id FROM availabilities WHERE id = $1)"
        ))
        .bind(availability_id)
        .fetch_optional(conn)
        .await?;

        Ok(program)
    }

    /// Drop-in programs visible from a course: the course's own and the
    /// instructor's global ones
    pub async fn find_dropins_for_course(&self, course: &Course) -> Result<Vec<ProgramDetails>, MentorWebError> {
        let programs = sqlx::query_as::<_, ProgramDetails>(&format!(
            r#"
            SELECT {PROGRAM_COLUMNS} FROM programs
            WHERE is_dropins = true
              AND (course_id = $1 OR (course_id IS NULL AND instructor_id = $2))
            ORDER BY id ASC
            "#
        ))
        .bind(course.id)
        .bind(course.instructor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(programs)
    }
}
