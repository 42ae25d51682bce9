//! Uptime Kuma HTTP client
//!
//! Uptime Kuma itself only speaks Socket.IO, so this client talks to the REST
//! API bridge deployed next to it (`KUMA_API_URL`, port 8000 by default). A
//! bearer token is obtained from `/login/access-token` and attached to every
//! monitor request. When the token is rejected mid-session the client logs in
//! again once and retries.
//!
//! # Example
//!
//! ```no_run
//! use kumasync::monitor::{KumaClient, MonitorClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = KumaClient::connect(
//!     "http://uptime-kuma-api:8000",
//!     "admin",
//!     "secret",
//!     Duration::from_secs(30),
//! )
//! .await?;
//!
//! for monitor in client.list_monitors().await? {
//!     println!("{} {}", monitor.id, monitor.name);
//! }
//! # Ok(())
//! # }
//! ```

use super::client::{Monitor, MonitorClient, MonitorError, NewMonitor};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// `/monitors` is either wrapped in an object or a bare array depending on the bridge version
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MonitorList {
    Wrapped { monitors: Vec<Monitor> },
    Bare(Vec<Monitor>),
}

impl From<MonitorList> for Vec<Monitor> {
    fn from(list: MonitorList) -> Self {
        match list {
            MonitorList::Wrapped { monitors } => monitors,
            MonitorList::Bare(monitors) => monitors,
        }
    }
}

pub struct KumaClient {
    /// Base URL without trailing slash
    base_url: String,
    username: String,
    password: String,
    http_client: Client,
    token: RwLock<String>,
}

impl KumaClient {
    /// Builds the client and logs in. Fails when the service is unreachable or
    /// rejects the credentials.
    pub async fn connect(
        base_url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, MonitorError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        let mut client = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            http_client,
            token: RwLock::new(String::new()),
        };

        let token = client.login().await?;
        *client.token.get_mut() = token;

        info!(url = %client.base_url, "Connected to Uptime Kuma");
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self) -> Result<String, MonitorError> {
        let url = self.endpoint("/login/access-token");
        debug!("Logging in to Uptime Kuma at {}", url);

        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await?;

        let response = check_status(response).await?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| MonitorError::InvalidResponse(format!("login response: {}", e)))?;

        Ok(token.access_token)
    }

    /// Sends an authorized request, logging in again once if the token was rejected
    async fn execute<F>(&self, build: F) -> Result<Response, MonitorError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let token = self.token.read().await.clone();
        let response = build(&self.http_client).bearer_auth(&token).send().await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response).await;
        }

        warn!("Uptime Kuma rejected the access token, logging in again");
        let token = self.login().await?;
        *self.token.write().await = token.clone();

        let response = build(&self.http_client).bearer_auth(&token).send().await?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, MonitorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED {
        return Err(MonitorError::Authentication(body));
    }
    Err(MonitorError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl MonitorClient for KumaClient {
    async fn list_monitors(&self) -> Result<Vec<Monitor>, MonitorError> {
        let url = self.endpoint("/monitors");
        let response = self.execute(|client| client.get(&url)).await?;

        let list: MonitorList = response
            .json()
            .await
            .map_err(|e| MonitorError::InvalidResponse(format!("monitor list: {}", e)))?;

        let monitors: Vec<Monitor> = list.into();
        debug!(count = monitors.len(), "Fetched monitors");
        Ok(monitors)
    }

    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<(), MonitorError> {
        let url = self.endpoint("/monitors");
        self.execute(|client| client.post(&url).json(monitor))
            .await?;
        Ok(())
    }

    async fn update_monitor_url(&self, id: u64, url: &str) -> Result<(), MonitorError> {
        let endpoint = self.endpoint(&format!("/monitors/{}", id));
        let body = serde_json::json!({ "url": url });
        self.execute(|client| client.patch(&endpoint).json(&body))
            .await?;
        Ok(())
    }
}

impl fmt::Debug for KumaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KumaClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
