//! Uptime Kuma integration
//!
//! - [`client`]: the [`MonitorClient`] contract and its wire types
//! - [`kuma`]: HTTP implementation against Uptime Kuma
//! - [`reconcile`](mod@reconcile): creating and updating monitors from discovered targets

pub mod client;
pub mod kuma;
pub mod reconcile;

pub use client::{Monitor, MonitorClient, MonitorError, NewMonitor};
pub use kuma::KumaClient;
pub use reconcile::{reconcile, ReconcileSummary};
