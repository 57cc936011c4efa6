//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Generation timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Generation base URL must start with http:// or https://")]
    InvalidBaseUrl,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
