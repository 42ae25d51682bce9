//! Command handlers. Each returns the process exit code.

use super::commands::{DiscoverArgs, SyncArgs};
use super::output::OutputFormatter;
use crate::config::SyncConfig;
use crate::discovery::discover_targets;
use crate::monitor::KumaClient;
use crate::sync::SyncService;
use anyhow::{Context, Result};
use tracing::{debug, error, info};

pub async fn handle_sync(args: &SyncArgs) -> i32 {
    match run_sync(args).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

pub async fn handle_discover(args: &DiscoverArgs) -> i32 {
    match run_discover(args) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

/// Environment configuration with `sync` flags applied on top
pub fn sync_config(args: &SyncArgs) -> Result<SyncConfig> {
    let mut config = SyncConfig::from_env()?;

    if let Some(dir) = &args.compose_dir {
        config.compose_dir = dir.clone();
    }
    if let Some(domain) = &args.domain {
        config.domain = domain.clone();
    }
    if let Some(interval) = args.interval {
        config.interval_secs = interval;
    }
    config.update_existing |= args.update_existing;
    config.only_included |= args.only_included;

    config.validate()?;
    Ok(config)
}

/// Environment configuration with `discover` flags applied on top
pub fn discover_config(args: &DiscoverArgs) -> Result<SyncConfig> {
    let mut config = SyncConfig::from_env()?;

    if let Some(dir) = &args.compose_dir {
        config.compose_dir = dir.clone();
    }
    if let Some(domain) = &args.domain {
        config.domain = domain.clone();
    }
    config.only_included |= args.only_included;

    Ok(config)
}

async fn run_sync(args: &SyncArgs) -> Result<()> {
    let config = sync_config(args)?;
    debug!("{}", config);

    let (username, password) = config.credentials()?;
    config.ensure_compose_dir()?;

    let client = KumaClient::connect(&config.api_url, username, password, config.request_timeout())
        .await
        .with_context(|| format!("Failed to log in to the Uptime Kuma API at {}", config.api_url))?;

    info!(compose_dir = %config.compose_dir.display(), "Scanning compose tree");
    if !config.domain.is_empty() {
        info!(domain = %config.domain, "DOMAIN expansion enabled");
    }
    if config.update_existing {
        info!("Monitors whose URL changed will be updated");
    }
    if config.only_included {
        info!("Scanning only include: targets when present");
    }

    let service = SyncService::new(client, config);

    if args.once {
        service.run_once().await?;
    } else {
        service.run().await;
    }
    Ok(())
}

fn run_discover(args: &DiscoverArgs) -> Result<()> {
    let config = discover_config(args)?;
    config.ensure_compose_dir()?;

    let targets = discover_targets(&config.compose_dir, &config.discovery_options())
        .context("Discovery failed")?;

    let output = OutputFormatter::new(args.format.into()).format(&targets)?;
    print!("{}", output);
    Ok(())
}
