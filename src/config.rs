//! Configuration module
//!
//! Reads `~/.config/servicehub/config.toml` (or the path given by
//! `SERVICEHUB_CONFIG` / `--config`). Every section is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::application::policy::StorePolicy;
use crate::infrastructure::DatabaseConfig;
use crate::shared::errors::InfraError;
use crate::shared::utils::RetryConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub booking: BookingConfig,
    pub retry: RetryConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Upper bound for any single store call, in milliseconds
    pub store_timeout_ms: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast buffer; slower subscribers lag past this many events
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults; a file that
    /// exists but does not parse or validate is an error.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.database.url.trim().is_empty() {
            return Err(InfraError::Config("database.url must not be empty".into()));
        }
        if self.booking.store_timeout_ms == 0 {
            return Err(InfraError::Config(
                "booking.store_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(InfraError::Config(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(InfraError::Config(
                "retry.backoff_multiplier must be at least 1.0".into(),
            ));
        }
        if self.events.capacity == 0 {
            return Err(InfraError::Config(
                "events.capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn store_policy(&self) -> StorePolicy {
        StorePolicy {
            timeout: Duration::from_millis(self.booking.store_timeout_ms),
            read_retry: self.retry.clone(),
        }
    }
}

/// `<config dir>/servicehub/config.toml`, falling back to the working
/// directory when the platform has no config dir.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("servicehub")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.booking.store_timeout_ms, 5_000);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.events.capacity, 1024);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            url = "sqlite://./test.db?mode=rwc"

            [booking]
            store_timeout_ms = 250

            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "sqlite://./test.db?mode=rwc");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay_ms, 100);

        let policy = config.store_policy();
        assert_eq!(policy.timeout, Duration::from_millis(250));
        assert_eq!(policy.read_retry.max_attempts, 5);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = AppConfig::from_toml("[booking]\nstore_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, InfraError::Config(_)));
    }

    #[test]
    fn zero_capacity_and_attempts_are_rejected() {
        assert!(AppConfig::from_toml("[events]\ncapacity = 0\n").is_err());
        assert!(AppConfig::from_toml("[retry]\nmax_attempts = 0\n").is_err());
        assert!(AppConfig::from_toml("[retry]\nbackoff_multiplier = 0.5\n").is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = AppConfig::from_toml("[booking\n").unwrap_err();
        assert!(matches!(err, InfraError::Toml(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("servicehub-no-such-config.toml");
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        assert!(default_config_path().ends_with("servicehub/config.toml"));
    }
}
