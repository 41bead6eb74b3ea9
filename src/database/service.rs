//! Database service layer
//!
//! This module provides a high-level interface to database operations

use chrono::NaiveDate;
use sqlx::{PgConnection, Postgres, Transaction};
use crate::database::{DatabasePool, UserRepository, ProgramRepository, AvailabilityRepository, AppointmentRepository, CommentRepository};
use crate::models::*;
use crate::scheduling::{QuotaCounts, QuotaScope};
use crate::utils::errors::MentorWebError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub programs: ProgramRepository,
    pub availabilities: AvailabilityRepository,
    pub appointments: AppointmentRepository,
    pub comments: CommentRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            programs: ProgramRepository::new(pool.clone()),
            availabilities: AvailabilityRepository::new(pool.clone()),
            appointments: AppointmentRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Start a transaction on the shared pool
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, MentorWebError> {
        Ok(self.pool.begin().await?)
    }

    /// Fetch a user or fail with `UserNotFound`
    pub async fn require_user(&self, user_id: i64) -> Result<User, MentorWebError> {
        self.users.find_by_id(user_id).await?
            .ok_or(MentorWebError::UserNotFound { user_id })
    }

    /// Fetch a user through an open transaction or fail with `UserNotFound`
    pub async fn require_user_in(&self, conn: &mut PgConnection, user_id: i64) -> Result<User, MentorWebError> {
        self.users.find_by_id_in(conn, user_id).await?
            .ok_or(MentorWebError::UserNotFound { user_id })
    }

    /// Serialize quota decisions for one host. Every transaction that counts a
    /// host's meetings and then books or reopens slots takes this lock before
    /// touching appointment or availability rows.
    pub async fn lock_host(&self, conn: &mut PgConnection, host_id: i64) -> Result<(), MentorWebError> {
        if !self.users.lock_for_update(conn, host_id).await? {
            return Err(MentorWebError::UserNotFound { user_id: host_id });
        }

        Ok(())
    }

    /// Fetch a program or fail with `ProgramNotFound`
    pub async fn require_program(&self, program_id: i64) -> Result<ProgramDetails, MentorWebError> {
        self.programs.find_by_id(program_id).await?
            .ok_or(MentorWebError::ProgramNotFound { program_id })
    }

    /// Fetch a program through an open transaction or fail with `ProgramNotFound`
    pub async fn require_program_in(&self, conn: &mut PgConnection, program_id: i64) -> Result<ProgramDetails, MentorWebError> {
        self.programs.find_by_id_in(conn, program_id).await?
            .ok_or(MentorWebError::ProgramNotFound { program_id })
    }

    /// Fetch an appointment or fail with `AppointmentNotFound`
    pub async fn require_appointment(&self, appointment_id: i64) -> Result<Appointment, MentorWebError> {
        self.appointments.find_by_id(appointment_id).await?
            .ok_or(MentorWebError::AppointmentNotFound { appointment_id })
    }

    /// Meetings a host holds on the day, week and month of `date`
    pub async fn quota_counts(&self, conn: &mut PgConnection, instructor_id: i64, date: NaiveDate) -> Result<QuotaCounts, MentorWebError> {
        let mut counts = QuotaCounts::default();
        for scope in [QuotaScope::Daily, QuotaScope::Weekly, QuotaScope::Monthly] {
            let (from, to) = scope.range(date);
            let held = self.appointments.count_held_between(&mut *conn, instructor_id, from, to).await?;
            match scope {
                QuotaScope::Daily => counts.daily = held,
                QuotaScope::Weekly => counts.weekly = held,
                QuotaScope::Monthly => counts.monthly = held,
            }
        }

        Ok(counts)
    }

    /// Deactivate a host's posted slots and windows across the scope around `date`.
    /// Returns (slots, windows) deactivated.
    pub async fn cascade_deactivation(
        &self,
        conn: &mut PgConnection,
        instructor_id: i64,
        date: NaiveDate,
        scope: QuotaScope,
    ) -> Result<(u64, u64), MentorWebError> {
        let (from, to) = scope.range(date);
        let slots = self.appointments.deactivate_posted_between(&mut *conn, instructor_id, from, to).await?;
        let windows = self.availabilities.deactivate_between(&mut *conn, instructor_id, from, to).await?;

        Ok((slots, windows))
    }
}
