//! The polling loop: discover, reconcile, sleep, repeat

use crate::config::SyncConfig;
use crate::discovery::{discover_targets, DiscoveryError};
use crate::monitor::{reconcile, MonitorClient, MonitorError, ReconcileSummary};
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, Span};

/// Errors that abort a single cycle. The loop logs them and carries on.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Monitor service error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("Discovery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Outcome of one successful cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub public: usize,
    pub backend: usize,
    pub total: usize,
    pub summary: ReconcileSummary,
}

pub struct SyncService<C> {
    client: C,
    config: SyncConfig,
}

impl<C: MonitorClient> SyncService<C> {
    pub fn new(client: C, config: SyncConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// One discovery and reconciliation pass
    pub async fn run_once(&self) -> Result<CycleReport, SyncError> {
        let start = Instant::now();

        // Directory walks and file reads block
        let root = self.config.compose_dir.clone();
        let options = self.config.discovery_options();
        let span = Span::current();
        let discovered = tokio::task::spawn_blocking(move || {
            span.in_scope(|| discover_targets(&root, &options))
        })
        .await??;
        let targets = discovered.merged();

        info!(
            public = discovered.public.len(),
            backend = discovered.backend.len(),
            total = targets.len(),
            "Discovered targets"
        );

        let summary = reconcile(&self.client, &targets, self.config.update_existing).await?;

        info!(
            created = summary.created,
            updated = summary.updated,
            failed = summary.failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            next_sync_secs = self.config.interval_secs,
            "Sync cycle completed"
        );

        Ok(CycleReport {
            public: discovered.public.len(),
            backend: discovered.backend.len(),
            total: targets.len(),
            summary,
        })
    }

    /// Runs cycles forever, sleeping the configured interval between them.
    ///
    /// Returns once Ctrl-C is received while sleeping; a running cycle is
    /// always completed first.
    pub async fn run(&self) {
        loop {
            if let Err(e) = self.run_once().await {
                error!(error = %e, "Sync failed");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval()) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, stopping");
                    return;
                }
            }
        }
    }
}
