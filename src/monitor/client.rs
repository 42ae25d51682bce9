//! Monitoring service abstraction
//!
//! Reconciliation only needs three operations from the monitoring service. They
//! are expressed as the [`MonitorClient`] trait so the sync loop can run against
//! Uptime Kuma in production and an in-memory double in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds between checks for created monitors
pub const DEFAULT_CHECK_INTERVAL_SECS: u32 = 60;
/// Seconds between retries after a failed check
pub const DEFAULT_RETRY_INTERVAL_SECS: u32 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Per-check request timeout in seconds
pub const DEFAULT_CHECK_TIMEOUT_SECS: u32 = 10;

/// Errors returned by monitoring service operations
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Transport-level failure (connection refused, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Non-success status other than 401
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// An existing monitor as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Absent for monitor types without a URL (ping, docker, ...)
    #[serde(default)]
    pub url: Option<String>,
}

/// Parameters for creating an HTTP monitor
///
/// Field names follow the monitoring service's wire format. Accepted status
/// codes are left to the service default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMonitor {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub url: String,
    pub interval: u32,
    #[serde(rename = "retryInterval")]
    pub retry_interval: u32,
    pub maxretries: u32,
    pub timeout: u32,
}

impl NewMonitor {
    /// HTTP monitor with the default check schedule
    pub fn http(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: "http".to_string(),
            name: name.into(),
            url: url.into(),
            interval: DEFAULT_CHECK_INTERVAL_SECS,
            retry_interval: DEFAULT_RETRY_INTERVAL_SECS,
            maxretries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_CHECK_TIMEOUT_SECS,
        }
    }
}

#[async_trait]
pub trait MonitorClient: Send + Sync {
    async fn list_monitors(&self) -> Result<Vec<Monitor>, MonitorError>;

    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<(), MonitorError>;

    async fn update_monitor_url(&self, id: u64, url: &str) -> Result<(), MonitorError>;
}
