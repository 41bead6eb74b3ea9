//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{MentorWebError, Result};
use crate::utils::helpers::is_valid_email;
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_scheduling_config(&settings.scheduling)?;
    validate_notification_config(&settings.notification)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(MentorWebError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(MentorWebError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(MentorWebError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate scheduling rules
fn validate_scheduling_config(config: &super::SchedulingConfig) -> Result<()> {
    if config.utc_offset_minutes.abs() > 14 * 60 {
        return Err(MentorWebError::Config(
            format!("UTC offset out of range: {} minutes", config.utc_offset_minutes)
        ));
    }

    if config.min_window_minutes <= 0 {
        return Err(MentorWebError::Config(
            "Minimum window length must be greater than 0".to_string()
        ));
    }

    if let Some(minutes) = config.default_slot_minutes {
        if minutes < 0 {
            return Err(MentorWebError::Config(
                "Default slot length cannot be negative".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate mail relay configuration
fn validate_notification_config(config: &super::NotificationConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    if config.api_url.is_empty() {
        return Err(MentorWebError::Config(
            "Mail relay URL is required when notifications are enabled".to_string()
        ));
    }

    url::Url::parse(&config.api_url)?;

    if !is_valid_email(&config.sender) {
        return Err(MentorWebError::Config(
            format!("Invalid sender address: {}", config.sender)
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(MentorWebError::Config(
            "Mail relay timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(MentorWebError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(MentorWebError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
