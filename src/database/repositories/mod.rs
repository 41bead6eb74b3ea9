//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod program;
pub mod availability;
pub mod appointment;
pub mod comment;

// Re-export repositories
pub use user::UserRepository;
pub use program::ProgramRepository;
pub use availability::AvailabilityRepository;
pub use appointment::{AppointmentRepository, Participant};
pub use comment::CommentRepository;
