//! Configuration management for kumasync
//!
//! Settings are read from environment variables with sensible defaults, the
//! way the container is usually deployed next to Uptime Kuma. CLI flags can
//! override individual fields afterwards.
//!
//! # Environment Variables
//!
//! - `KUMA_API_URL`: base URL of the Uptime Kuma REST API bridge (the
//!   `uptime-kuma-api` container in front of Uptime Kuma, not the Uptime Kuma
//!   web UI itself) - default: "http://uptime-kuma-api:8000"
//! - `KUMA_USERNAME` / `KUMA_PASSWORD`: credentials - **required** for `sync`
//! - `DOMAIN`: value for `${DOMAIN}` / `$DOMAIN` in labels - default: ""
//! - `COMPOSE_DIR`: root of the compose tree - default: "/compose"
//! - `SYNC_INTERVAL`: seconds between cycles - default: "600"
//! - `UPDATE_EXISTING`: update monitor URLs that changed - default: "false"
//! - `ONLY_INCLUDED`: scan only `include:` targets when present - default: "false"
//! - `KUMA_REQUEST_TIMEOUT`: HTTP timeout in seconds - default: "30"
//!
//! Logging is configured separately, see [`crate::util::LoggingConfig`].
//!
//! Boolean variables accept `1`, `true`, `yes`, `on` (case-insensitive).

use crate::discovery::{is_truthy, DiscoveryOptions};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://uptime-kuma-api:8000";
pub const DEFAULT_COMPOSE_DIR: &str = "/compose";
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KUMA_USERNAME / KUMA_PASSWORD not set")]
    MissingCredentials,

    #[error("COMPOSE_DIR does not exist: {0:?}")]
    ComposeDirMissing(PathBuf),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// REST bridge base URL, no trailing slash
    pub api_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub domain: String,
    pub compose_dir: PathBuf,
    pub interval_secs: u64,
    pub update_existing: bool,
    pub only_included: bool,
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            username: None,
            password: None,
            domain: String::new(),
            compose_dir: PathBuf::from(DEFAULT_COMPOSE_DIR),
            interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            update_existing: false,
            only_included: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SyncConfig {
    /// Loads configuration from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when a numeric variable is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = env::var("KUMA_API_URL")
            .unwrap_or(defaults.api_url)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_url,
            username: non_empty_var("KUMA_USERNAME"),
            password: non_empty_var("KUMA_PASSWORD"),
            domain: env::var("DOMAIN").unwrap_or_default(),
            compose_dir: env::var("COMPOSE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.compose_dir),
            interval_secs: parse_var("SYNC_INTERVAL", defaults.interval_secs)?,
            update_existing: env_bool("UPDATE_EXISTING", defaults.update_existing),
            only_included: env_bool("ONLY_INCLUDED", defaults.only_included),
            request_timeout_secs: parse_var("KUMA_REQUEST_TIMEOUT", defaults.request_timeout_secs)?,
        })
    }

    /// Checks value ranges that do not depend on the filesystem or credentials
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Sync interval must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be between 1 second and 10 minutes".to_string(),
            ));
        }
        Ok(())
    }

    /// Username and password, both required to talk to Uptime Kuma
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) => Ok((user, pass)),
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    pub fn ensure_compose_dir(&self) -> Result<(), ConfigError> {
        if self.compose_dir.exists() {
            Ok(())
        } else {
            Err(ConfigError::ComposeDirMissing(self.compose_dir.clone()))
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions::new(self.domain.clone(), self.only_included)
    }
}

impl fmt::Display for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "kumasync Configuration:")?;
        writeln!(f, "  API URL: {}", self.api_url)?;
        writeln!(
            f,
            "  Username: {}",
            self.username.as_deref().unwrap_or("<unset>")
        )?;
        writeln!(
            f,
            "  Password: {}",
            if self.password.is_some() { "<set>" } else { "<unset>" }
        )?;
        writeln!(f, "  Domain: {}", self.domain)?;
        writeln!(f, "  Compose Dir: {}", self.compose_dir.display())?;
        writeln!(f, "  Sync Interval: {}s", self.interval_secs)?;
        writeln!(f, "  Update Existing: {}", self.update_existing)?;
        writeln!(f, "  Only Included: {}", self.only_included)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name).map(|v| is_truthy(&v)).unwrap_or(default)
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            field: name.to_string(),
            error: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 9] = [
        "KUMA_API_URL",
        "KUMA_USERNAME",
        "KUMA_PASSWORD",
        "DOMAIN",
        "COMPOSE_DIR",
        "SYNC_INTERVAL",
        "UPDATE_EXISTING",
        "ONLY_INCLUDED",
        "KUMA_REQUEST_TIMEOUT",
    ];

    /// Sets variables for the duration of a test and restores them afterwards
    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn set(values: &[(&'static str, &str)]) -> Self {
            let saved = VARS.iter().map(|k| (*k, env::var(k).ok())).collect();
            for key in VARS {
                env::remove_var(key);
            }
            for (key, value) in values {
                env::set_var(key, value);
            }
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        let _guard = EnvGuard::set(&[]);

        let config = SyncConfig::from_env().unwrap();

        assert_eq!(config, SyncConfig::default());
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guard = EnvGuard::set(&[
            ("KUMA_API_URL", "https://kuma-api.example.com/"),
            ("KUMA_USERNAME", "admin"),
            ("KUMA_PASSWORD", "secret"),
            ("DOMAIN", "example.com"),
            ("COMPOSE_DIR", "/srv/compose"),
            ("SYNC_INTERVAL", "120"),
            ("UPDATE_EXISTING", "YES"),
            ("ONLY_INCLUDED", "on"),
            ("KUMA_REQUEST_TIMEOUT", "5"),
        ]);

        let config = SyncConfig::from_env().unwrap();

        assert_eq!(config.api_url, "https://kuma-api.example.com");
        assert_eq!(config.credentials().unwrap(), ("admin", "secret"));
        assert_eq!(config.domain, "example.com");
        assert_eq!(config.compose_dir, PathBuf::from("/srv/compose"));
        assert_eq!(config.interval(), Duration::from_secs(120));
        assert!(config.update_existing);
        assert!(config.only_included);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_invalid_interval_is_parse_error() {
        let _guard = EnvGuard::set(&[("SYNC_INTERVAL", "ten minutes")]);

        match SyncConfig::from_env() {
            Err(ConfigError::ParseError { field, .. }) => assert_eq!(field, "SYNC_INTERVAL"),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_empty_credentials_count_as_missing() {
        let _guard = EnvGuard::set(&[("KUMA_USERNAME", "admin"), ("KUMA_PASSWORD", "")]);

        let config = SyncConfig::from_env().unwrap();
        assert!(config.credentials().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_interval() {
        let config = SyncConfig {
            interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_default_api_url_points_at_bridge() {
        let _guard = EnvGuard::set(&[]);

        let config = SyncConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://uptime-kuma-api:8000");
        assert!(!config.to_string().contains("Log Level"));
    }

    #[test]
    fn test_missing_compose_dir() {
        let config = SyncConfig {
            compose_dir: PathBuf::from("/definitely/not/here"),
            ..Default::default()
        };
        assert!(matches!(
            config.ensure_compose_dir(),
            Err(ConfigError::ComposeDirMissing(_))
        ));
    }

    #[test]
    fn test_display_hides_password() {
        let config = SyncConfig {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let display = config.to_string();
        assert!(display.contains("Password: <set>"));
        assert!(!display.contains("hunter2"));
    }
}
