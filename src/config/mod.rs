//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MENNESKESYN_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use menneskesyn::config::AppConfig;
//!
//! # fn main() -> Result<(), menneskesyn::config::ConfigError> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//!
//! println!("Using model {}", config.ai.model);
//! # Ok(())
//! # }
//! ```

mod ai;
mod error;
mod logging;
mod quiz;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use quiz::QuizConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Generation service configuration (Gemini)
    #[serde(default)]
    pub ai: AiConfig,

    /// Quiz content configuration
    #[serde(default)]
    pub quiz: QuizConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MENNESKESYN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MENNESKESYN__AI__API_KEY=...` -> `ai.api_key = ...`
    /// - `MENNESKESYN__LOGGING__FORMAT=json` -> `logging.format = json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MENNESKESYN")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
