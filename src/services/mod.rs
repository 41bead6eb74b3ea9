//! Services module
//!
//! This module contains business logic services

pub mod availability;
pub mod calendar;
pub mod comment;
pub mod notification;
pub mod reservation;

// Re-export commonly used services
pub use availability::AvailabilityService;
pub use calendar::{CalendarService, MeetingSummary};
pub use comment::CommentService;
pub use notification::{NotificationService, RelayMessage, RelayAttachment};
pub use reservation::ReservationService;

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::scheduling::{Clock, LocalClock};
use crate::utils::errors::{MentorWebError, Result};

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub availability_service: AvailabilityService,
    pub reservation_service: ReservationService,
    pub comment_service: CommentService,
    pub notification_service: NotificationService,
    db: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory on the campus clock from the settings
    pub fn new(settings: &Settings, db: DatabaseService) -> Result<Self> {
        let offset = settings.scheduling.utc_offset_minutes;
        let clock = LocalClock::new(offset)
            .ok_or_else(|| MentorWebError::Config(format!("invalid UTC offset: {} minutes", offset)))?;

        Self::with_clock(settings, db, Arc::new(clock))
    }

    /// Create a new ServiceFactory with an explicit clock
    pub fn with_clock(settings: &Settings, db: DatabaseService, clock: Arc<dyn Clock>) -> Result<Self> {
        let notification_service = NotificationService::new(settings)?;

        Ok(Self {
            availability_service: AvailabilityService::new(db.clone(), clock.clone(), settings),
            reservation_service: ReservationService::new(db.clone(), clock, notification_service.clone()),
            comment_service: CommentService::new(db.clone()),
            notification_service,
            db,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = crate::database::health_check(self.db.pool()).await.is_ok();

        ServiceHealthStatus {
            database_healthy,
            notifications_enabled: self.notification_service.is_enabled(),
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    pub notifications_enabled: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if !self.notifications_enabled {
            issues.push("Notification delivery disabled".to_string());
        }

        issues
    }
}
