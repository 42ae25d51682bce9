//! Reconciliation of discovered targets against existing monitors

use super::client::{Monitor, MonitorClient, MonitorError, NewMonitor};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, info, warn};

/// Counts for one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl fmt::Display for ReconcileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} updated={} unchanged={} failed={}",
            self.created, self.updated, self.unchanged, self.failed
        )
    }
}

/// Creates a monitor for every target name the service does not know yet and,
/// with `update_existing`, points known monitors at their new URL.
///
/// Only listing the monitors can fail the whole pass; a failed create or update
/// is logged, counted and skipped.
pub async fn reconcile<C>(
    client: &C,
    targets: &BTreeMap<String, String>,
    update_existing: bool,
) -> Result<ReconcileSummary, MonitorError>
where
    C: MonitorClient + ?Sized,
{
    let monitors = client.list_monitors().await?;
    let existing: HashMap<&str, &Monitor> = monitors.iter().map(|m| (m.name.as_str(), m)).collect();

    let mut summary = ReconcileSummary::default();

    for (name, url) in targets {
        let Some(monitor) = existing.get(name.as_str()) else {
            match client.create_monitor(&NewMonitor::http(name, url)).await {
                Ok(()) => {
                    info!(name = %name, url = %url, "Created monitor");
                    summary.created += 1;
                }
                Err(e) => {
                    warn!(name = %name, error = %e, "Failed to create monitor");
                    summary.failed += 1;
                }
            }
            continue;
        };

        let old_url = monitor.url.as_deref().unwrap_or_default();
        if !update_existing || old_url.is_empty() || old_url == url {
            summary.unchanged += 1;
            continue;
        }

        match client.update_monitor_url(monitor.id, url).await {
            Ok(()) => {
                info!(name = %name, old_url = %old_url, url = %url, "Updated monitor");
                summary.updated += 1;
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Failed to update monitor");
                summary.failed += 1;
            }
        }
    }

    debug!(%summary, "Reconciliation finished");
    Ok(summary)
}
