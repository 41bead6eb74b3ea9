//! Appointment comment service

use tracing::{info, debug};
use crate::database::DatabaseService;
use crate::models::{AppointmentComment, CommentView};
use crate::utils::errors::{MentorWebError, Result};
use crate::utils::helpers::truncate_text;

/// Upper bound on a single comment
pub const MAX_COMMENT_LENGTH: usize = 2000;

#[derive(Clone, Debug)]
pub struct CommentService {
    db: DatabaseService,
}

impl CommentService {
    /// Create a new CommentService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Leave a comment on an appointment
    pub async fn add_comment(&self, user_id: i64, appointment_id: i64, text: &str) -> Result<AppointmentComment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MentorWebError::InvalidInput("comment cannot be empty".to_string()));
        }
        if text.chars().count() > MAX_COMMENT_LENGTH {
            return Err(MentorWebError::InvalidInput(format!(
                "comment is longer than {} characters",
                MAX_COMMENT_LENGTH
            )));
        }

        let user = self.db.require_user(user_id).await?;
        let appointment = self.db.require_appointment(appointment_id).await?;

        let comment = self.db.comments.create(appointment.id, user.id, text).await?;
        info!(comment_id = comment.id, appointment_id = appointment.id, user_id = user.id, "Comment added");
        debug!(comment_id = comment.id, preview = %truncate_text(text, 60), "Comment text");

        Ok(comment)
    }

    /// Comments on an appointment, oldest first
    pub async fn list_comments(&self, appointment_id: i64) -> Result<Vec<CommentView>> {
        let appointment = self.db.require_appointment(appointment_id).await?;
        debug!(appointment_id = appointment.id, "Listing comments");

        self.db.comments.list_for_appointment(appointment.id).await
    }

    /// Remove a comment; only its author may do so
    pub async fn delete_comment(&self, user_id: i64, appointment_id: i64, comment_id: i64) -> Result<()> {
        let comment = self.db.comments.find_by_id(comment_id).await?
            .filter(|c| c.appointment_id == appointment_id)
            .ok_or(MentorWebError::CommentNotFound { comment_id })?;

        if comment.user_id != user_id {
            return Err(MentorWebError::PermissionDenied(
                "you can only delete your own comments".to_string(),
            ));
        }

        self.db.comments.delete(comment.id).await?;
        info!(comment_id = comment.id, appointment_id = appointment_id, user_id = user_id, "Comment deleted");

        Ok(())
    }
}
