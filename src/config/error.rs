//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to read pricing file {path}: {source}")]
    PricingFileUnreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse pricing file {path}: {source}")]
    PricingFileInvalid {
        path: String,
        source: serde_json::Error,
    },
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Staleness window must exceed the heartbeat interval")]
    StalenessBelowHeartbeat,

    #[error("Check interval must be non-zero")]
    ZeroCheckInterval,

    #[error("At least one admin id is required")]
    NoAdmins,

    #[error("Reminder threshold must be non-zero")]
    ZeroReminderThreshold,
}
