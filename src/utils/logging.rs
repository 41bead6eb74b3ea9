//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the MentorWeb application.

use chrono::NaiveDate;
use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::config::LoggingConfig;
use crate::models::AppointmentStatus;
use crate::scheduling::QuotaScope;
use crate::utils::errors::{MentorWebError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the log file on drop and must be kept alive by the caller.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| MentorWebError::Config(format!("invalid log level '{}': {}", config.level, e)))?;

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "mentorweb.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let json_layer = config.json.then(|| fmt::layer().json().with_writer(std::io::stdout));
    let text_layer = (!config.json).then(|| fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MentorWebError::Config(format!("logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a reservation attempt that was admitted
pub fn log_reservation(appointment_id: i64, student_id: i64, status: AppointmentStatus, cascaded: Option<QuotaScope>) {
    info!(
        appointment_id = appointment_id,
        student_id = student_id,
        status = %status,
        cascaded = cascaded.map(|s| s.as_str()),
        "Appointment reserved"
    );
}

/// Log a quota cascade
pub fn log_cascade(instructor_id: i64, date: NaiveDate, scope: QuotaScope, slots: u64, windows: u64) {
    warn!(
        instructor_id = instructor_id,
        date = %date,
        scope = scope.as_str(),
        slots_deactivated = slots,
        windows_deactivated = windows,
        "Meeting limit reached, remaining availability deactivated"
    );
}

/// Log availability management actions
pub fn log_availability_action(availability_id: i64, host_id: i64, action: &str, details: Option<&str>) {
    info!(
        availability_id = availability_id,
        host_id = host_id,
        action = action,
        details = details,
        "Availability action performed"
    );
}

/// Log a rejected batch entry
pub fn log_rejected_entry(host_id: i64, program_id: i64, reason: &str) {
    debug!(
        host_id = host_id,
        program_id = program_id,
        reason = reason,
        "Availability entry rejected"
    );
}
