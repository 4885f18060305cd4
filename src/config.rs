/// Service configuration
///
/// Settings are read from an optional TOML file and then overridden by
/// environment variables (a `.env` file is loaded first when present).
/// Every setting has a default, so the service runs with no file at all.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::alert::stalenesses::DEFAULT_STALE_AFTER_MINUTES;
use crate::logging::{self, Component, LogLevel};
use crate::model::FloodError;

pub const DEFAULT_FLOOD_SERVICE_URL: &str = "http://localhost:8050";
pub const DEFAULT_GEOCODE_URL: &str = "http://localhost:8060";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the flood data service.
    pub flood_service_url: String,
    /// Base URL of the place-name lookup service.
    pub geocode_url: String,
    /// `production`, `test`, `dev`...
    pub environment: String,
    pub log_level: String,
    pub log_file: Option<String>,
    pub stale_after_minutes: u64,
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            flood_service_url: DEFAULT_FLOOD_SERVICE_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            environment: "dev".to_string(),
            log_level: "info".to_string(),
            log_file: None,
            stale_after_minutes: DEFAULT_STALE_AFTER_MINUTES,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, FloodError> {
        let config: AppConfig = toml::from_str(text)
            .map_err(|e| FloodError::ConfigError(format!("invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, then applies `.env` and process
    /// environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FloodError> {
        dotenv::dotenv().ok();

        let path = path.as_ref();
        let mut config = if path.exists() {
            let text = fs::read_to_string(path).map_err(|e| {
                FloodError::ConfigError(format!("cannot read {}: {}", path.display(), e))
            })?;
            AppConfig::from_toml_str(&text)?
        } else {
            logging::debug(
                Component::Config,
                None,
                &format!("No config file at {}, using defaults", path.display()),
            );
            AppConfig::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies environment-style overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), FloodError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FLOOD_SERVICE_URL") {
            self.flood_service_url = v;
        }
        if let Some(v) = lookup("GEOCODE_URL") {
            self.geocode_url = v;
        }
        if let Some(v) = lookup("FLOOD_ENV") {
            self.environment = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = lookup("LOG_FILE") {
            self.log_file = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("STALE_AFTER_MINUTES") {
            self.stale_after_minutes = parse_number("STALE_AFTER_MINUTES", &v)?;
        }
        if let Some(v) = lookup("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse_number("HTTP_TIMEOUT_SECS", &v)?;
        }
        self.validate()
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
            || self.environment.eq_ignore_ascii_case("prod")
    }

    pub fn log_level(&self) -> Result<LogLevel, FloodError> {
        self.log_level.parse().map_err(FloodError::ConfigError)
    }

    fn validate(&self) -> Result<(), FloodError> {
        self.log_level()?;
        if self.flood_service_url.trim().is_empty() {
            return Err(FloodError::ConfigError("flood_service_url is empty".to_string()));
        }
        if self.http_timeout_secs == 0 {
            return Err(FloodError::ConfigError("http_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, FloodError> {
    value
        .trim()
        .parse()
        .map_err(|_| FloodError::ConfigError(format!("{} must be a whole number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_file_is_empty() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.stale_after_minutes, 60);
        assert!(!config.is_production());
    }

    #[test]
    fn test_toml_values_are_read() {
        let config = AppConfig::from_toml_str(
            r#"
            flood_service_url = "https://flood.example"
            environment = "production"
            log_level = "warn"
            stale_after_minutes = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.flood_service_url, "https://flood.example");
        assert!(config.is_production());
        assert_eq!(config.log_level().unwrap(), LogLevel::Warning);
        assert_eq!(config.stale_after_minutes, 90);
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let err = AppConfig::from_toml_str("log_level = \"loud\"").unwrap_err();
        assert!(matches!(err, FloodError::ConfigError(_)), "got {:?}", err);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::from_toml_str("flood_service_url = \"https://file\"").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("FLOOD_SERVICE_URL", "https://env"),
            ("FLOOD_ENV", "production"),
            ("STALE_AFTER_MINUTES", "30"),
            ("LOG_FILE", ""),
        ]);
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.flood_service_url, "https://env");
        assert!(config.is_production());
        assert_eq!(config.stale_after_minutes, 30);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_non_numeric_override_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|key| (key == "HTTP_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            FloodError::ConfigError("HTTP_TIMEOUT_SECS must be a whole number, got 'soon'".to_string())
        );
    }
}
