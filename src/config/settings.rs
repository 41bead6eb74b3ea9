//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub scheduling: SchedulingConfig,
    pub notification: NotificationConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

/// Scheduling rules
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulingConfig {
    /// Offset of the campus clock from UTC. Dates and times are stored in this zone.
    pub utc_offset_minutes: i32,
    /// Shortest availability window an instructor may post.
    pub min_window_minutes: i64,
    /// Slot length used when neither the request nor the program names one.
    pub default_slot_minutes: Option<i32>,
}

/// Mail relay configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub api_url: String,
    pub api_key: Option<String>,
    pub sender: String,
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
    pub json: bool,
}

fn default_acquire_timeout() -> u64 {
    30
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::from_file("config")
    }

    /// Load settings from the given file (extension optional) layered over defaults
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("MENTORWEB").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Parse a complete settings document
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::MentorWebError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/mentorweb".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: default_acquire_timeout(),
            },
            scheduling: SchedulingConfig {
                utc_offset_minutes: -480,
                min_window_minutes: 30,
                default_slot_minutes: None,
            },
            notification: NotificationConfig {
                enabled: false,
                api_url: "http://localhost:8025/api/send".to_string(),
                api_key: None,
                sender: "no-reply@mentorweb.local".to_string(),
                timeout_seconds: 10,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                json: false,
            },
        }
    }
}
