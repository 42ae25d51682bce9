//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kumasync::monitor::{Monitor, MonitorClient, MonitorError, NewMonitor};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Writes `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// A compose tree shaped like a homelab repository:
///
/// ```text
/// compose.yml                  include: media + proxy (+ a missing file)
/// stacks/media/compose.yml     jellyfin (list labels), sonarr (map labels)
/// stacks/proxy/compose.yaml    traefik dashboard with two hosts
/// scratch/compose.yml          not included anywhere
/// broken.yml                   invalid YAML
/// ```
pub fn homelab_tree() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path();

    write_file(
        root,
        "compose.yml",
        r#"
include:
  - stacks/media/compose.yml
  - stacks/proxy/compose.yaml
  - stacks/missing/compose.yml
"#,
    );

    write_file(
        root,
        "stacks/media/compose.yml",
        r#"
services:
  jellyfin:
    image: jellyfin/jellyfin
    container_name: jellyfin-server
    labels:
      - traefik.enable=true
      - traefik.http.routers.jellyfin.rule=Host(`jellyfin.${DOMAIN}`)
      - traefik.http.services.jellyfin.loadbalancer.server.port=8096
      - homepage.name=Jellyfin
  sonarr:
    image: linuxserver/sonarr
    labels:
      traefik.enable: "true"
      traefik.http.routers.sonarr.rule: Host(`sonarr.$DOMAIN`)
      traefik.http.services.sonarr.loadbalancer.server.port: 8989
  transcoder:
    image: worker
"#,
    );

    write_file(
        root,
        "stacks/proxy/compose.yaml",
        r#"
services:
  traefik:
    image: traefik:v3
    labels:
      - traefik.enable=true
      - traefik.http.routers.dashboard.rule=Host(`traefik.${DOMAIN}`) || Host(`proxy.${DOMAIN}`)
      - traefik.http.services.traefik.loadbalancer.server.port=8080
"#,
    );

    write_file(
        root,
        "scratch/compose.yml",
        r#"
services:
  playground:
    labels:
      homepage.href: https://playground.${DOMAIN}
"#,
    );

    write_file(root, "broken.yml", "services: [unclosed\n");

    dir
}

/// In-memory monitoring service that records every call
#[derive(Default)]
pub struct FakeKuma {
    pub monitors: Mutex<Vec<Monitor>>,
    pub updates: Mutex<Vec<(u64, String)>>,
    pub fail_listing: bool,
}

impl FakeKuma {
    pub fn with_monitors(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors: Mutex::new(monitors),
            ..Default::default()
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.monitors
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.name.clone())
            .collect()
    }

    pub fn url_of(&self, name: &str) -> Option<String> {
        self.monitors
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.url.clone())
    }
}

#[async_trait]
impl MonitorClient for FakeKuma {
    async fn list_monitors(&self) -> Result<Vec<Monitor>, MonitorError> {
        if self.fail_listing {
            return Err(MonitorError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.monitors.lock().unwrap().clone())
    }

    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<(), MonitorError> {
        let mut monitors = self.monitors.lock().unwrap();
        let id = monitors.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        monitors.push(Monitor {
            id,
            name: monitor.name.clone(),
            url: Some(monitor.url.clone()),
        });
        Ok(())
    }

    async fn update_monitor_url(&self, id: u64, url: &str) -> Result<(), MonitorError> {
        self.updates.lock().unwrap().push((id, url.to_string()));
        let mut monitors = self.monitors.lock().unwrap();
        match monitors.iter_mut().find(|m| m.id == id) {
            Some(monitor) => {
                monitor.url = Some(url.to_string());
                Ok(())
            }
            None => Err(MonitorError::Status {
                status: 404,
                body: format!("monitor {} not found", id),
            }),
        }
    }
}
