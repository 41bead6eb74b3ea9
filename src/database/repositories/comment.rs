//! Appointment comment repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::appointment::{AppointmentComment, CommentView};
use crate::utils::errors::MentorWebError;

#[derive(Clone, Debug)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new comment
    pub async fn create(&self, appointment_id: i64, user_id: i64, text: &str) -> Result<AppointmentComment, MentorWebError> {
        let comment = sqlx::query_as::<_, AppointmentComment>(
            r#"
            INSERT INTO appointment_comments (appointment_id, user_id, appointment_comment, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, appointment_id, user_id, appointment_comment, created_at
            "#
        )
        .bind(appointment_id)
        .bind(user_id)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Find comment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<AppointmentComment>, MentorWebError> {
        let comment = sqlx::query_as::<_, AppointmentComment>(
            "SELECT id, appointment_id, user_id, appointment_comment, created_at FROM appointment_comments WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Comments on an appointment with their authors, oldest first
    pub async fn list_for_appointment(&self, appointment_id: i64) -> Result<Vec<CommentView>, MentorWebError> {
        let comments = sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.id, c.user_id, u.name, u.title, u.pronouns, c.appointment_comment, c.created_at
            FROM appointment_comments c
            INNER JOIN users u ON u.id = c.user_id
            WHERE c.appointment_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#
        )
        .bind(appointment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Delete comment
    pub async fn delete(&self, id: i64) -> Result<(), MentorWebError> {
        sqlx::query("DELETE FROM appointment_comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
