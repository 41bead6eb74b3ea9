//! Error handling for MentorWeb
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use crate::scheduling::QuotaScope;

/// Main error type for MentorWeb application
#[derive(Error, Debug)]
pub enum MentorWebError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Course not found: {course_id}")]
    CourseNotFound { course_id: i64 },

    #[error("Program not found: {program_id}")]
    ProgramNotFound { program_id: i64 },

    #[error("Availability not found: {availability_id}")]
    AvailabilityNotFound { availability_id: i64 },

    #[error("Appointment not found: {appointment_id}")]
    AppointmentNotFound { appointment_id: i64 },

    #[error("Comment not found: {comment_id}")]
    CommentNotFound { comment_id: i64 },

    #[error("Availability time conflict or it already exists for this instructor")]
    AvailabilityConflict,

    #[error("Appointment is not available: {0}")]
    NotReservable(String),

    #[error("{0} meeting limit reached")]
    LimitReached(QuotaScope),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Mail relay specific errors
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Mail relay request failed: {0}")]
    RequestFailed(String),

    #[error("Mail relay rejected message with status {0}")]
    Rejected(u16),

    #[error("Missing recipient address for user {0}")]
    MissingRecipient(i64),
}

/// Result type alias for MentorWeb operations
pub type Result<T> = std::result::Result<T, MentorWebError>;

/// Result type alias for notification delivery
pub type NotificationResult<T> = std::result::Result<T, NotificationError>;

impl MentorWebError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            MentorWebError::Database(_) => false,
            MentorWebError::Migration(_) => false,
            MentorWebError::Notification(_) => true,
            MentorWebError::Config(_) => false,
            MentorWebError::PermissionDenied(_) => false,
            MentorWebError::UserNotFound { .. } => false,
            MentorWebError::CourseNotFound { .. } => false,
            MentorWebError::ProgramNotFound { .. } => false,
            MentorWebError::AvailabilityNotFound { .. } => false,
            MentorWebError::AppointmentNotFound { .. } => false,
            MentorWebError::CommentNotFound { .. } => false,
            MentorWebError::AvailabilityConflict => false,
            MentorWebError::NotReservable(_) => false,
            MentorWebError::LimitReached(_) => false,
            MentorWebError::InvalidStateTransition { .. } => false,
            MentorWebError::Http(_) => true,
            MentorWebError::Serialization(_) => false,
            MentorWebError::Io(_) => true,
            MentorWebError::UrlParse(_) => false,
            MentorWebError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MentorWebError::Database(_) => ErrorSeverity::Critical,
            MentorWebError::Migration(_) => ErrorSeverity::Critical,
            MentorWebError::Config(_) => ErrorSeverity::Critical,
            MentorWebError::PermissionDenied(_) => ErrorSeverity::Warning,
            MentorWebError::LimitReached(_) => ErrorSeverity::Info,
            MentorWebError::AvailabilityConflict => ErrorSeverity::Info,
            MentorWebError::NotReservable(_) => ErrorSeverity::Info,
            MentorWebError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status code an API host should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            MentorWebError::UserNotFound { .. }
            | MentorWebError::CourseNotFound { .. }
            | MentorWebError::AvailabilityNotFound { .. }
            | MentorWebError::AppointmentNotFound { .. }
            | MentorWebError::CommentNotFound { .. } => 404,
            MentorWebError::ProgramNotFound { .. } => 400,
            MentorWebError::PermissionDenied(_) => 403,
            MentorWebError::LimitReached(_) => 409,
            MentorWebError::AvailabilityConflict
            | MentorWebError::NotReservable(_)
            | MentorWebError::InvalidStateTransition { .. }
            | MentorWebError::InvalidInput(_) => 400,
            _ => 500,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
