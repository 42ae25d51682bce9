//! kumasync - Uptime Kuma monitors from docker compose labels
//!
//! This library discovers HTTP services declared in a tree of docker compose
//! files and keeps a matching set of Uptime Kuma monitors in place.
//!
//! # Core Concepts
//!
//! - **Discovery**: walking the compose tree (following `include:` lists) and
//!   deriving monitor targets from service labels
//! - **Public target**: `https://` URL from `homepage.href` or a Traefik
//!   `Host(...)` rule
//! - **Backend target**: `http://<container>:<port>` from the Traefik load
//!   balancer port label
//! - **Reconciliation**: creating monitors that are missing and, optionally,
//!   updating URLs that changed
//!
//! # Example Usage
//!
//! ```no_run
//! use kumasync::discovery::{discover_targets, DiscoveryOptions};
//! use kumasync::monitor::{reconcile, KumaClient};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let targets = discover_targets(
//!     Path::new("/compose"),
//!     &DiscoveryOptions::new("example.com", false),
//! )?;
//!
//! let client = KumaClient::connect(
//!     "http://uptime-kuma-api:8000",
//!     "admin",
//!     "secret",
//!     Duration::from_secs(30),
//! )
//! .await?;
//!
//! let summary = reconcile(&client, &targets.merged(), false).await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`discovery`]: compose parsing and target derivation
//! - [`monitor`]: Uptime Kuma client and reconciliation
//! - [`sync`]: the polling loop
//! - [`config`]: environment configuration

pub mod cli;
pub mod config;
pub mod discovery;
pub mod monitor;
pub mod sync;
pub mod util;

pub use config::{ConfigError, SyncConfig};
pub use discovery::{discover_targets, DiscoveredTargets, DiscoveryError, DiscoveryOptions};
pub use monitor::{KumaClient, MonitorClient, MonitorError, ReconcileSummary};
pub use sync::{CycleReport, SyncError, SyncService};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
