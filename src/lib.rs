//! MentorWeb scheduling core
//!
//! Appointment scheduling for instructors, mentors and students. Hosts post
//! availability windows that are split into bookable slots; students reserve
//! slots under the host's daily, weekly and monthly meeting limits, and
//! confirmed bookings are announced by email with a calendar attachment.

#![allow(non_snake_case)]

pub mod config;
pub mod services;
pub mod models;
pub mod database;
pub mod scheduling;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{MentorWebError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use scheduling::{Clock, FixedClock, LocalClock};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
