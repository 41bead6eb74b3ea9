//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod program;
pub mod availability;
pub mod appointment;

// Re-export commonly used models
pub use user::{User, AccountType, CreateUserRequest};
pub use program::{Course, ProgramDetails, CreateCourseRequest, CreateProgramRequest};
pub use availability::{Availability, AvailabilityStatus, AvailabilityEntry, AvailabilityListing, CreateAvailabilityRequest, PostAvailabilityRequest, EntryOutcome, BatchReport};
pub use appointment::{Appointment, AppointmentStatus, AppointmentListing, AppointmentComment, CommentView, CreateAppointmentRequest, MeetingFilter, ReservationOutcome};
