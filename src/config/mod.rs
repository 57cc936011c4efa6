//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `SURVEY_ASSISTANT`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use survey_assistant::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.logging.init_tracing();
//! ```

mod error;
mod generation;
mod logging;

pub use error::{ConfigError, ValidationError};
pub use generation::{AdapterKind, GenerationConfig};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// assistant that runs entirely on the local heuristics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Generation backend selection and HTTP settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SURVEY_ASSISTANT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `SURVEY_ASSISTANT__GENERATION__ADAPTER=http` -> `generation.adapter = http`
    /// - `SURVEY_ASSISTANT__LOGGING__LEVEL=debug` -> `logging.level = debug`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SURVEY_ASSISTANT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.generation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "SURVEY_ASSISTANT__GENERATION__ADAPTER",
        "SURVEY_ASSISTANT__GENERATION__BASE_URL",
        "SURVEY_ASSISTANT__GENERATION__TIMEOUT_SECS",
        "SURVEY_ASSISTANT__LOGGING__LEVEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.generation.adapter, AdapterKind::Offline);
        assert_eq!(config.generation.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_http_adapter() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SURVEY_ASSISTANT__GENERATION__ADAPTER", "http");
        env::set_var("SURVEY_ASSISTANT__GENERATION__BASE_URL", "https://gen.example.com");
        env::set_var("SURVEY_ASSISTANT__GENERATION__TIMEOUT_SECS", "10");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.generation.adapter, AdapterKind::Http);
        assert_eq!(config.generation.base_url.as_deref(), Some("https://gen.example.com"));
        assert_eq!(config.generation.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SURVEY_ASSISTANT__LOGGING__LEVEL", "loud");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_err());
    }
}
