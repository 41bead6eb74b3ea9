//! Test context for unified test setup
//!
//! This module provides a unified test context that wires a test database,
//! a mock mail relay and a controllable clock into a real `ServiceFactory`.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};
use MentorWeb::config::Settings;
use MentorWeb::database::DatabaseService;
use MentorWeb::models::*;
use MentorWeb::scheduling::{window::DATE_FORMAT, Clock};
use MentorWeb::services::ServiceFactory;

use super::database_helper::{TestDatabase, TestError};
use super::mail_mock::MailRelayMock;
use super::test_data::{program_request, user_request};

/// Monday 2030-01-07, 09:00 local time
pub fn default_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 7)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap()
}

/// Clock the tests can move forward
pub struct TestClock {
    now: Mutex<NaiveDateTime>,
}

impl TestClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

/// Test configuration options
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub notifications_enabled: bool,
    pub now: NaiveDateTime,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            notifications_enabled: false,
            now: default_now(),
        }
    }
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub database: TestDatabase,
    pub mail: MailRelayMock,
    pub settings: Settings,
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub clock: Arc<TestClock>,
}

impl TestContext {
    /// Create a context with default settings, or `None` without a database
    pub async fn try_new() -> Option<Self> {
        Self::try_new_with_config(TestConfig::default()).await
    }

    /// Create a context with custom configuration, or `None` without a database
    pub async fn try_new_with_config(config: TestConfig) -> Option<Self> {
        let database = TestDatabase::try_new().await?;
        match Self::with_database(database, config).await {
            Ok(ctx) => Some(ctx),
            Err(e) => panic!("Failed to create test context: {}", e),
        }
    }

    async fn with_database(database: TestDatabase, config: TestConfig) -> Result<Self, TestError> {
        let mail = MailRelayMock::new().await;

        let mut settings = Settings::default();
        settings.database.url = database.database_url.clone();
        settings.notification.enabled = config.notifications_enabled;
        settings.notification.api_url = mail.url();
        settings.notification.sender = "noreply@mentorweb.test".to_string();
        settings.notification.timeout_seconds = 5;

        let db = DatabaseService::new(database.pool.clone());
        let clock = Arc::new(TestClock::new(config.now));
        let services = ServiceFactory::with_clock(&settings, db.clone(), clock.clone())?;

        Ok(Self {
            database,
            mail,
            settings,
            db,
            services,
            clock,
        })
    }

    /// Current test time
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Date `days` after today, as the wire format
    pub fn day(&self, days: i64) -> String {
        (self.now().date() + Duration::days(days)).format(DATE_FORMAT).to_string()
    }

    pub async fn create_user(&self, account_type: AccountType) -> User {
        self.db.users.create(user_request(account_type)).await.expect("Failed to create user")
    }

    pub async fn create_student(&self) -> User {
        self.create_user(AccountType::Student).await
    }

    pub async fn create_host(&self) -> User {
        self.create_user(AccountType::Instructor).await
    }

    pub async fn create_course(&self, host: &User) -> Course {
        self.db.programs
            .create_course(CreateCourseRequest {
                course_name: "CS 101".to_string(),
                instructor_id: host.id,
            })
            .await
            .expect("Failed to create course")
    }

    /// Create a program after letting the caller adjust the defaults
    pub async fn create_program(
        &self,
        host: &User,
        course: Option<&Course>,
        adjust: impl FnOnce(&mut CreateProgramRequest),
    ) -> ProgramDetails {
        let mut request = program_request(host.id, course.map(|c| c.id));
        adjust(&mut request);
        self.db.programs.create(request).await.expect("Failed to create program")
    }

    /// Post one window and return its id and slots
    pub async fn post_window(
        &self,
        host: &User,
        program: &ProgramDetails,
        days: i64,
        start_time: &str,
        end_time: &str,
    ) -> (i64, Vec<Appointment>) {
        let request = PostAvailabilityRequest {
            course_id: program.course_id,
            availabilities: vec![AvailabilityEntry {
                id: program.id,
                date: self.day(days),
                start_time: start_time.to_string(),
                end_time: end_time.to_string(),
            }],
            ..Default::default()
        };

        let report = self.services.availability_service
            .create_availabilities(host.id, request)
            .await
            .expect("Failed to post availability");

        match &report.entries[0] {
            EntryOutcome::Created { availability_id, .. } => {
                let slots = self.services.availability_service
                    .slots(*availability_id)
                    .await
                    .expect("Failed to load slots");
                (*availability_id, slots)
            }
            EntryOutcome::Rejected { reason } => panic!("Window was rejected: {}", reason),
        }
    }

    pub async fn appointment(&self, appointment_id: i64) -> Appointment {
        self.db.require_appointment(appointment_id).await.expect("Failed to load appointment")
    }

    pub async fn availability(&self, availability_id: i64) -> Availability {
        self.db.availabilities
            .find_by_id(availability_id)
            .await
            .expect("Failed to load availability")
            .expect("Availability missing")
    }

    pub fn db_pool(&self) -> &sqlx::PgPool {
        &self.database.pool
    }
}
